use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use tally_core::counter::{
    Clock, Counter, CounterSpec, ElementId, GroupingFormatter, ManualClock, PollingViewport,
};
use tally_core::AppConfig;

/// Options for a single traced count-up
pub struct TraceOptions {
    pub value: u64,
    pub duration_ms: Option<i64>,
    pub step_ms: u64,
    pub prefix: String,
    pub suffix: String,
}

/// Run one count-up against a manual clock and print every committed value
pub fn run(config: &AppConfig, options: TraceOptions) -> Result<()> {
    let duration = match options.duration_ms {
        Some(ms) => Duration::from_millis(ms.max(0) as u64),
        None => config.counter.duration(),
    };
    let step = Duration::from_millis(options.step_ms.max(1));

    let manual = ManualClock::new();
    let clock: Rc<dyn Clock> = Rc::new(manual.clone());
    let formatter = GroupingFormatter::new(config.counter.thousands_separator.clone());

    let element = ElementId(0);
    let mut port = PollingViewport::new();
    let mut counter = Counter::new(
        CounterSpec::new(options.value)
            .with_duration(duration)
            .with_prefix(options.prefix)
            .with_suffix(options.suffix),
        Some(element),
    )
    .with_easing(config.counter.easing);
    counter.mount(&mut port, config.counter.visibility_threshold);
    port.report(element, 1.0);

    println!(
        "Tracing count-up to {} over {} ms ({:?}, {} ms frames)\n",
        options.value,
        duration.as_millis(),
        config.counter.easing,
        step.as_millis()
    );

    let mut frames = 0u64;
    let mut last = None;
    loop {
        let needs_frame = counter.on_frame(&clock);
        frames += 1;
        let value = counter.display_value();
        if last != Some(value) {
            println!(
                "  {:>6} ms  {}",
                manual.now().as_millis(),
                counter.render(&formatter)
            );
            last = Some(value);
        }
        if !needs_frame {
            break;
        }
        manual.advance(step);
    }

    counter.teardown(&mut port);
    println!("\n{} frames", frames);

    Ok(())
}
