#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use embassy_futures::yield_now;
use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

// ---------------------------------------------------------------------------
// Simulated bus
// ---------------------------------------------------------------------------

/// A peripheral with 256 signed 16-bit registers behind a latched selector.
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub registers: [i16; 256],
    pub selected: u8,
    /// Answer reads with a single byte, then stop.
    pub short_reads: bool,
}

impl Default for SimDevice {
    fn default() -> Self {
        Self { registers: [0; 256], selected: 0, short_reads: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin(u8),
    Write(u8, Vec<u8>),
    Read(u8, usize),
    End(u8),
}

#[derive(Default)]
pub struct SimState {
    pub devices: BTreeMap<u8, SimDevice>,
    pub log: Vec<Event>,
    /// Suspend once in the middle of every transaction so concurrent tasks
    /// get a chance to run.
    pub yield_inside: bool,
}

impl SimState {
    fn apply(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        let Some(device) = self.devices.get_mut(&address) else {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        };
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    self.log.push(Event::Write(address, bytes.to_vec()));
                    match **bytes {
                        [] => {}
                        [register] => device.selected = register,
                        [register, low] => {
                            device.selected = register;
                            device.registers[register as usize] =
                                i16::from(low);
                        }
                        [register, high, low] => {
                            device.selected = register;
                            device.registers[register as usize] =
                                i16::from_be_bytes([high, low]);
                        }
                        _ => return Err(ErrorKind::Overrun),
                    }
                }
                Operation::Read(buf) => {
                    self.log.push(Event::Read(address, buf.len()));
                    let value = device.registers[device.selected as usize];
                    let bytes = value.to_be_bytes();
                    if device.short_reads && buf.len() > 1 {
                        buf[0] = bytes[0];
                        return Err(ErrorKind::NoAcknowledge(
                            NoAcknowledgeSource::Data,
                        ));
                    }
                    for (dst, src) in buf.iter_mut().zip(bytes.iter()) {
                        *dst = *src;
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct SimBus {
    pub state: Rc<RefCell<SimState>>,
}

impl SimBus {
    pub fn with_devices(addresses: &[u8]) -> Self {
        let bus = Self::default();
        bus.set_present(addresses);
        bus
    }

    /// Replace the set of devices answering on the bus.
    pub fn set_present(&self, addresses: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.devices.retain(|a, _| addresses.contains(a));
        for &a in addresses {
            state.devices.entry(a).or_default();
        }
    }

    pub fn device(&self, address: u8) -> SimDevice {
        self.state.borrow().devices[&address].clone()
    }

    pub fn set_register(&self, address: u8, register: u8, value: i16) {
        let mut state = self.state.borrow_mut();
        let device = state.devices.get_mut(&address).unwrap();
        device.registers[register as usize] = value;
    }

    pub fn set_short_reads(&self, address: u8) {
        let mut state = self.state.borrow_mut();
        state.devices.get_mut(&address).unwrap().short_reads = true;
    }

    pub fn log(&self) -> Vec<Event> {
        self.state.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    /// Addresses written to, in order, excluding empty presence probes.
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.log()
            .into_iter()
            .filter_map(|e| match e {
                Event::Write(a, bytes) if !bytes.is_empty() => Some((a, bytes)),
                _ => None,
            })
            .collect()
    }
}

impl ErrorType for SimBus {
    type Error = ErrorKind;
}

impl I2c for SimBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let yield_inside = {
            let mut state = self.state.borrow_mut();
            state.log.push(Event::Begin(address));
            state.yield_inside
        };
        if yield_inside {
            yield_now().await;
        }
        let mut state = self.state.borrow_mut();
        let result = state.apply(address, operations);
        state.log.push(Event::End(address));
        result
    }
}

// ---------------------------------------------------------------------------
// Delay
// ---------------------------------------------------------------------------

/// Records every requested pause and yields once per pause.
#[derive(Default)]
pub struct SimDelay {
    pub pauses_ns: Vec<u32>,
    /// Set by the `busy` probe if a pause was ever taken while the bus lock
    /// was held.
    pub slept_with_bus_locked: bool,
    pub busy: Option<Box<dyn Fn() -> bool>>,
}

impl SimDelay {
    pub fn watching(busy: impl Fn() -> bool + 'static) -> Self {
        Self { busy: Some(Box::new(busy)), ..Default::default() }
    }

    pub fn count_ms(&self, ms: u32) -> usize {
        self.pauses_ns.iter().filter(|&&ns| ns == ms * 1_000_000).count()
    }
}

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        if let Some(busy) = &self.busy {
            if busy() {
                self.slept_with_bus_locked = true;
            }
        }
        self.pauses_ns.push(ns);
        yield_now().await;
    }
}
