mod common;

use common::{Event, SimBus, SimDelay};
use embassy_futures::join::join;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use i2c_roster::{Error, ScanConfig, Scanner, SharedBus};

fn bus_with(addresses: &[u8]) -> (SharedBus<NoopRawMutex, SimBus>, SimBus) {
    let sim = SimBus::with_devices(addresses);
    (SharedBus::new(sim.clone()), sim)
}

#[futures_test::test]
async fn read_int_register_selects_then_reads_big_endian() {
    let (bus, sim) = bus_with(&[0x42]);
    sim.set_register(0x42, 7, 0x1234);
    sim.set_register(0x42, 8, -2);

    assert_eq!(bus.read_int_register(0x42, 7).await, Ok(0x1234));
    assert_eq!(bus.read_int_register(0x42, 8).await, Ok(-2));
    assert_eq!(sim.writes(), vec![(0x42, vec![7]), (0x42, vec![8])]);
}

#[futures_test::test]
async fn set_register_then_read_int() {
    let (bus, sim) = bus_with(&[0x42]);
    sim.set_register(0x42, 3, 300);

    bus.set_register(0x42, 3).await.unwrap();
    assert_eq!(sim.device(0x42).selected, 3);
    assert_eq!(bus.read_int(0x42).await, Ok(300));
}

#[futures_test::test]
async fn short_read_is_an_error_not_a_partial_value() {
    let (bus, sim) = bus_with(&[0x42]);
    sim.set_register(0x42, 0, 0x7F01);
    sim.set_short_reads(0x42);

    assert_eq!(bus.read_int(0x42).await, Err(Error::ShortRead));
    assert_eq!(bus.read_int_register(0x42, 0).await, Err(Error::ShortRead));
}

#[futures_test::test]
async fn reading_an_absent_device_reports_the_bus_error() {
    let (bus, _sim) = bus_with(&[]);

    assert_eq!(
        bus.read_int_register(0x42, 0).await,
        Err(Error::I2c(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address
        )))
    );
    assert!(bus.set_register(0x42, 0).await.is_err());
    assert!(bus.write_int_register(0x42, 0, 1).await.is_err());
}

#[futures_test::test]
async fn write_int_register_uses_variable_width_framing() {
    let (bus, sim) = bus_with(&[0x50]);

    bus.write_int_register(0x50, 1, 200).await.unwrap();
    bus.write_int_register(0x50, 2, 256).await.unwrap();
    bus.write_int_register(0x50, 3, -5).await.unwrap();
    bus.write_int_register(0x50, 4, 0).await.unwrap();

    assert_eq!(
        sim.writes(),
        vec![
            (0x50, vec![1, 200]),
            (0x50, vec![2, 0x01, 0x00]),
            (0x50, vec![3, 0xFF, 0xFB]),
            (0x50, vec![4, 0]),
        ]
    );
    // Each write is a single transaction.
    let begins =
        sim.log().iter().filter(|e| matches!(e, Event::Begin(_))).count();
    assert_eq!(begins, 4);
}

#[futures_test::test]
async fn written_values_read_back_through_a_device() {
    let (bus, _sim) = bus_with(&[0x50]);

    for (register, value) in
        [(0u8, 0i16), (1, 255), (2, 256), (3, -1), (4, i16::MIN), (5, 12345)]
    {
        bus.write_int_register(0x50, register, value).await.unwrap();
        assert_eq!(bus.read_int_register(0x50, register).await, Ok(value));
    }
}

#[futures_test::test]
async fn wake_sends_an_empty_transaction_and_ignores_failure() {
    let (bus, sim) = bus_with(&[0x20]);

    bus.wake(0x20).await;
    bus.wake(0x21).await;

    assert_eq!(
        sim.log(),
        vec![
            Event::Begin(0x20),
            Event::Write(0x20, vec![]),
            Event::End(0x20),
            Event::Begin(0x21),
            Event::End(0x21),
        ]
    );
}

#[futures_test::test]
async fn out_of_range_address_never_reaches_the_bus() {
    let (bus, sim) = bus_with(&[0x20]);

    assert_eq!(bus.read_int(0x80).await, Err(Error::InvalidAddress(0x80)));
    assert_eq!(
        bus.read_int_register(0xFF, 1).await,
        Err(Error::InvalidAddress(0xFF))
    );
    assert_eq!(
        bus.write_int_register(0x90, 1, 1).await,
        Err(Error::InvalidAddress(0x90))
    );
    assert!(bus.set_register(0x80, 1).await.is_err());
    bus.wake(0x80).await;
    assert!(!bus.probe(0x80).await);

    assert!(sim.log().is_empty());
}

#[futures_test::test]
async fn lock_is_released_after_every_call() {
    let (bus, _sim) = bus_with(&[0x20]);

    let _ = bus.read_int_register(0x20, 0).await;
    assert!(!bus.is_busy());
    let _ = bus.read_int_register(0x21, 0).await;
    assert!(!bus.is_busy());
    let _ = bus.write_int_register(0x20, 0, 1000).await;
    assert!(!bus.is_busy());
}

/// Transactions from a sweep and from register access never interleave, and
/// the select-then-read pair of `read_int_register` stays together.
#[futures_test::test]
async fn concurrent_transactions_are_serialized() {
    let (bus, sim) = bus_with(&[0x10, 0x42]);
    sim.state.borrow_mut().yield_inside = true;
    for register in 0..26 {
        sim.set_register(0x42, register, i16::from(register) * 100);
    }
    let scanner: Scanner<'_, NoopRawMutex, SimBus> =
        Scanner::new(&bus, ScanConfig::default());
    let mut delay = SimDelay::default();

    let reads = async {
        let mut values = Vec::new();
        for register in 0..26u8 {
            values.push(bus.read_int_register(0x42, register).await);
        }
        values
    };
    let (_, values) = join(scanner.sweep(&mut delay), reads).await;

    for (register, value) in values.into_iter().enumerate() {
        assert_eq!(value, Ok(register as i16 * 100));
    }
    assert_eq!(scanner.roster().as_slice(), &[0x10, 0x42]);

    let log = sim.log();
    let mut open: Option<u8> = None;
    for event in &log {
        match *event {
            Event::Begin(a) => {
                assert_eq!(open, None, "nested transaction at {:#x}", a);
                open = Some(a);
            }
            Event::End(a) => {
                assert_eq!(open, Some(a));
                open = None;
            }
            Event::Write(a, _) | Event::Read(a, _) => {
                assert_eq!(open, Some(a));
            }
        }
    }

    // Every register select is immediately followed by its read.
    for (i, event) in log.iter().enumerate() {
        if let Event::Write(0x42, bytes) = event {
            if bytes.len() == 1 {
                assert_eq!(log[i + 1], Event::End(0x42));
                assert_eq!(log[i + 2], Event::Begin(0x42));
                assert_eq!(log[i + 3], Event::Read(0x42, 2));
            }
        }
    }
}
