use core::fmt::Write as _;

use crate::prelude::*;
use embassy_nrf::uarte::Uarte;
use embassy_time::Delay;
use heapless::String;
use i2c_roster::console::write_help;

/// Longest command line accepted; longer input is discarded up to the next
/// line ending.
pub const LINE_CAPACITY: usize = 32;
/// Room for the longest reply, a 26-register `p` dump.
pub const REPLY_CAPACITY: usize = 2048;

/// Serial console: reads one line at a time, runs it and writes the reply.
#[embassy_executor::task]
pub async fn console_task(mut uart: Uarte<'static>, scanner: &'static AppScanner) {
    let console = Console::new(scanner);
    let mut delay = Delay;
    let mut line: String<LINE_CAPACITY> = String::new();
    let mut reply: String<REPLY_CAPACITY> = String::new();
    let mut overflowed = false;
    let mut byte = [0u8; 1];

    let _ = write_help(&mut reply);
    send(&mut uart, &reply).await;

    loop {
        if let Err(e) = uart.read(&mut byte).await {
            warn!("Console read failed: {:?}", e);
            continue;
        }

        match byte[0] {
            b'\r' | b'\n' => {
                reply.clear();
                if overflowed {
                    let _ = writeln!(reply, "Line too long");
                } else if line.is_empty() {
                    continue;
                } else if console
                    .execute(&line, &mut delay, &mut reply)
                    .await
                    .is_err()
                {
                    warn!("Console reply truncated");
                }
                line.clear();
                overflowed = false;
                send(&mut uart, &reply).await;
            }
            b => {
                if line.push(char::from(b)).is_err() {
                    overflowed = true;
                }
            }
        }
    }
}

async fn send(uart: &mut Uarte<'static>, text: &str) {
    if let Err(e) = uart.write(text.as_bytes()).await {
        warn!("Console write failed: {:?}", e);
    }
}
