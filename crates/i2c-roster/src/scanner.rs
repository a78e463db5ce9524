//! Hot-plug discovery.
//!
//! A sweep probes every address in range once and merges the result into
//! the roster in place. The roster and the probe sequence are both
//! ascending, so a single cursor into the roster is enough to tell a known
//! device from a new one or a vanished one.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use crate::bus::{SharedBus, MAX_ADDRESS};
use crate::roster::{Roster, SharedRoster, ROSTER_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    /// First address probed.
    pub first: u8,
    /// Last address probed, inclusive.
    pub last: u8,
    /// Pause between probes, with the bus released.
    pub probe_gap_ms: u32,
    /// Pause between sweeps when running periodically.
    pub interval_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    InvalidRange { first: u8, last: u8 },
}

impl ScanConfig {
    pub const fn new(
        first: u8,
        last: u8,
        probe_gap_ms: u32,
        interval_ms: u32,
    ) -> Result<Self, ConfigError> {
        if first > last || last > MAX_ADDRESS {
            return Err(ConfigError::InvalidRange { first, last });
        }
        Ok(Self { first, last, probe_gap_ms, interval_ms })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { first: 0, last: MAX_ADDRESS, probe_gap_ms: 1, interval_ms: 200 }
    }
}

/// What a single probe result did to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Nothing answered.
    Absent,
    /// Already tracked at the cursor.
    Matched(u8),
    /// A tracked device below the probed address stopped answering. The
    /// probed address must be tried again against the shifted roster.
    Removed(u8),
    /// Newly discovered and tracked.
    Inserted(u8),
    /// Newly discovered but the roster is full.
    Dropped(u8),
}

/// Progress through one sweep: the address being probed, how far the
/// roster has been reconciled, and which answering devices found it full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanCursor {
    address: u8,
    last: u8,
    position: usize,
    done: bool,
    /// Bit `a` set: address `a` answered but was dropped.
    deferred: u128,
}

/// Roster changes made by [`ScanCursor::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<const N: usize> {
    /// Entries the sweep never reached, ascending.
    pub removed: Vec<u8, N>,
    /// Dropped devices that fit once the stale entries were gone, ascending.
    pub admitted: Vec<u8, N>,
}

impl ScanCursor {
    pub fn new(first: u8, last: u8) -> Self {
        Self {
            address: first,
            last,
            position: 0,
            done: first > last,
            deferred: 0,
        }
    }

    /// The next address to probe, or `None` once the range is exhausted.
    pub fn address(&self) -> Option<u8> {
        (!self.done).then_some(self.address)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn advance(&mut self) {
        if self.address >= self.last {
            self.done = true;
        } else {
            self.address += 1;
        }
    }

    /// Fold the probe result for [`address`](Self::address) into `roster`.
    pub fn record<const N: usize>(
        &mut self,
        roster: &mut Roster<N>,
        present: bool,
    ) -> Outcome {
        if self.done {
            return Outcome::Absent;
        }
        let address = self.address;
        if !present {
            self.advance();
            return Outcome::Absent;
        }

        match roster.get(self.position) {
            Some(tracked) if tracked == address => {
                self.position += 1;
                self.advance();
                Outcome::Matched(address)
            }
            Some(tracked) if tracked < address => {
                // Skipped over by a live higher address: it is gone. Stay on
                // the current address.
                roster.remove(self.position);
                Outcome::Removed(tracked)
            }
            _ => {
                let outcome = match roster.insert(self.position, address) {
                    Ok(()) => {
                        self.position += 1;
                        Outcome::Inserted(address)
                    }
                    Err(_) => {
                        self.deferred |= 1 << address;
                        Outcome::Dropped(address)
                    }
                };
                self.advance();
                outcome
            }
        }
    }

    /// Drop every entry the sweep never reached, then admit devices that
    /// were dropped earlier in the sweep into the freed slots, lowest
    /// address first. Tracked entries are never evicted.
    pub fn finish<const N: usize>(self, roster: &mut Roster<N>) -> Settled<N> {
        let mut settled = Settled { removed: Vec::new(), admitted: Vec::new() };
        while let Some(address) = roster.remove(self.position) {
            // At most N entries can be removed.
            let _ = settled.removed.push(address);
        }

        let mut deferred = self.deferred;
        while deferred != 0 && !roster.is_full() {
            let address = deferred.trailing_zeros() as u8;
            deferred &= deferred - 1;
            if roster.contains(address) {
                continue;
            }
            let position = roster
                .iter()
                .position(|tracked| tracked > address)
                .unwrap_or(roster.len());
            if roster.insert(position, address).is_ok() {
                let _ = settled.admitted.push(address);
            }
        }
        settled
    }
}

/// Summary of one completed sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepReport {
    /// Addresses that answered, counting each address once.
    pub present: u8,
    pub inserted: u8,
    pub removed: u8,
    /// Answered but not tracked because the roster was full.
    pub dropped: u8,
}

impl SweepReport {
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.removed > 0
    }
}

/// Owns the device roster for one bus.
///
/// Sweeps may be started from several tasks (the periodic background task
/// and an on-demand request); they serialize on the working roster. Readers
/// use [`roster`](Self::roster), which only ever returns the result of a
/// completed sweep.
pub struct Scanner<'a, M: RawMutex, I2C, const N: usize = ROSTER_CAPACITY> {
    bus: &'a SharedBus<M, I2C>,
    config: ScanConfig,
    working: Mutex<M, Roster<N>>,
    published: SharedRoster<M, N>,
}

impl<'a, M: RawMutex, I2C, const N: usize> Scanner<'a, M, I2C, N> {
    pub const fn new(bus: &'a SharedBus<M, I2C>, config: ScanConfig) -> Self {
        Self {
            bus,
            config,
            working: Mutex::new(Roster::new()),
            published: SharedRoster::new(),
        }
    }

    pub fn bus(&self) -> &'a SharedBus<M, I2C> {
        self.bus
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Roster as of the last completed sweep.
    pub fn roster(&self) -> Roster<N> {
        self.published.snapshot()
    }

    pub fn is_present(&self, address: u8) -> bool {
        self.published.contains(address)
    }
}

impl<M: RawMutex, I2C: I2c, const N: usize> Scanner<'_, M, I2C, N> {
    /// Probe the configured range once and reconcile the roster.
    ///
    /// The bus lock is taken per probe only; `delay` runs with the bus free.
    pub async fn sweep<D: DelayNs>(&self, delay: &mut D) -> SweepReport {
        let mut roster = self.working.lock().await;
        let mut cursor = ScanCursor::new(self.config.first, self.config.last);
        let mut report = SweepReport::default();

        while let Some(address) = cursor.address() {
            let present = self.bus.probe(address).await;
            match cursor.record(&mut *roster, present) {
                Outcome::Absent => {}
                Outcome::Matched(_) => report.present += 1,
                Outcome::Removed(gone) => {
                    info!("Device {:#x} detached", gone);
                    report.removed += 1;
                }
                Outcome::Inserted(new) => {
                    info!("Device {:#x} attached", new);
                    report.present += 1;
                    report.inserted += 1;
                }
                Outcome::Dropped(new) => {
                    warn!("Roster full, not tracking device {:#x}", new);
                    report.present += 1;
                    report.dropped += 1;
                }
            }
            delay.delay_ms(self.config.probe_gap_ms).await;
        }

        let settled = cursor.finish(&mut *roster);
        for &gone in &settled.removed {
            info!("Device {:#x} detached", gone);
            report.removed += 1;
        }
        for &new in &settled.admitted {
            info!("Device {:#x} attached", new);
            report.inserted += 1;
            report.dropped -= 1;
        }

        self.published.publish(&*roster);
        debug!("Sweep done: {:?}", report);
        report
    }

    /// Sweep forever, pausing `interval_ms` between sweeps. Never returns.
    pub async fn run<D: DelayNs>(&self, delay: &mut D) {
        loop {
            self.sweep(delay).await;
            delay.delay_ms(self.config.interval_ms).await;
        }
    }
}
