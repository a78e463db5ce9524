use crate::prelude::*;
use embassy_time::Delay;

/// Time given to peripherals to power up before the first sweep.
pub const STARTUP_DELAY: Duration = Duration::from_secs(1);

/// Background hot-plug detection. Runs forever; each sweep publishes a
/// fresh roster for the console to read.
#[embassy_executor::task]
pub async fn scan_task(scanner: &'static AppScanner) {
    Timer::after(STARTUP_DELAY).await;

    let config = scanner.config();
    info!(
        "Hot-plug scan of {=u8:#x}..={=u8:#x} every {} ms",
        config.first,
        config.last,
        config.interval_ms
    );
    scanner.run(&mut Delay).await;
}
