use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

/// Default number of devices tracked on one bus.
pub const ROSTER_CAPACITY: usize = 8;

/// Ordered, duplicate-free list of device addresses seen on the bus.
///
/// Entries are kept strictly ascending. The container never grows past `N`;
/// an insertion into a full roster is refused and the device is simply not
/// tracked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster<const N: usize = ROSTER_CAPACITY> {
    devices: Vec<u8, N>,
}

impl<const N: usize> Roster<N> {
    pub const fn new() -> Self {
        Self { devices: Vec::new() }
    }

    /// Insert `address` at `position`, shifting later entries right.
    ///
    /// Returns the address back if the roster is full. The caller keeps the
    /// ordering: `position` must lie between neighbours that bracket
    /// `address`.
    pub fn insert(&mut self, position: usize, address: u8) -> Result<(), u8> {
        if position > self.devices.len() {
            return Err(address);
        }
        self.devices.insert(position, address)
    }

    /// Remove the entry at `position`, shifting later entries left.
    pub fn remove(&mut self, position: usize) -> Option<u8> {
        if position < self.devices.len() {
            Some(self.devices.remove(position))
        } else {
            None
        }
    }

    pub fn contains(&self, address: u8) -> bool {
        self.devices.iter().any(|&a| a == address)
    }

    pub fn get(&self, position: usize) -> Option<u8> {
        self.devices.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.devices.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.devices
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.devices.iter().copied()
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Roster<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]}", self.as_slice())
    }
}

/// Last published roster, readable from any task.
///
/// The scanner reconciles a private working copy and publishes it here once
/// a sweep completes, so readers never see entries mid-shift.
pub struct SharedRoster<M: RawMutex, const N: usize = ROSTER_CAPACITY> {
    roster: Mutex<M, RefCell<Roster<N>>>,
}

impl<M: RawMutex, const N: usize> SharedRoster<M, N> {
    pub const fn new() -> Self {
        Self { roster: Mutex::new(RefCell::new(Roster::new())) }
    }

    pub fn publish(&self, roster: &Roster<N>) {
        self.roster.lock(|r| r.borrow_mut().clone_from(roster));
    }

    /// Copy of the most recently published roster.
    pub fn snapshot(&self) -> Roster<N> {
        self.roster.lock(|r| r.borrow().clone())
    }

    pub fn contains(&self, address: u8) -> bool {
        self.roster.lock(|r| r.borrow().contains(address))
    }
}

impl<M: RawMutex, const N: usize> Default for SharedRoster<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
