/*
 *  tests/vfd_integration.rs
 *
 *  Integration tests for the clock plugin against a mock bus
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 */

use std::thread;
use std::time::{Duration, Instant};

use chrono::NaiveTime;

use vfdclock::clock::{format_hms, FixedClock};
use vfdclock::config::{ClockConfig, Config, VfdConfig};
use vfdclock::plugin::{Plugin, StopToken, ThreadHost, VfdClockPlugin};
use vfdclock::transport::{MockTransport, TransportEvent};
use vfdclock::vfd::registers::{REG_BRIGHTNESS, REG_CONTROL, REG_TEXT};
use vfdclock::vfd::VfdDriver;

fn text_frame(text: &[u8]) -> Vec<u8> {
    let mut wire = vec![REG_TEXT];
    wire.extend_from_slice(text);
    wire
}

fn open_driver() -> (VfdDriver<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let mut driver = VfdDriver::new(transport.clone(), &VfdConfig::default());
    driver.initialize().unwrap();
    (driver, transport)
}

#[test]
fn test_long_text_sends_first_twelve_chars() {
    let (mut driver, transport) = open_driver();

    for text in ["HELLO WORLD!!", "0123456789ABCDEF", "a much longer line of text than fits"] {
        driver.write_text(text);
        let last = transport.state().lock().unwrap().last_write().unwrap();
        assert_eq!(last.len(), 13);
        assert_eq!(last, text_frame(&text.as_bytes()[..12]));
    }
}

#[test]
fn test_short_text_is_padded_to_frame() {
    let (mut driver, transport) = open_driver();

    for len in 0..=12 {
        let text = "X".repeat(len);
        driver.write_text(&text);

        let mut expected = text.into_bytes();
        expected.resize(12, b' ');
        assert_eq!(transport.state().lock().unwrap().last_write(), Some(text_frame(&expected)));
    }
}

#[test]
fn test_init_register_order() {
    let (_driver, transport) = open_driver();

    let state = transport.state();
    let state = state.lock().unwrap();
    assert_eq!(
        state.events,
        vec![
            TransportEvent::Open { bus: 1, address: 0x10, speed_hz: 100_000 },
            TransportEvent::Write { address: 0x10, bytes: vec![REG_CONTROL, 0b001] },
            TransportEvent::Write { address: 0x10, bytes: vec![REG_BRIGHTNESS, 110] },
        ]
    );
}

#[test]
fn test_init_failure_leaves_no_trace() {
    let transport = MockTransport::failing_open();
    let mut plugin = VfdClockPlugin::new(transport.clone(), &Config::default());

    assert!(plugin.init(&ThreadHost::default()).is_err());
    assert!(!plugin.driver().is_open());
    assert!(transport.state().lock().unwrap().events.is_empty());

    // host never runs the service, but cleanup must still be safe
    plugin.cleanup(&ThreadHost::default());
    assert!(transport.state().lock().unwrap().events.is_empty());
}

#[test]
fn test_shutdown_twice_closes_once() {
    let (mut driver, transport) = open_driver();
    driver.shutdown();
    driver.shutdown();

    let state = transport.state();
    let state = state.lock().unwrap();
    assert_eq!(state.close_count(), 1);
    // enable, brightness, blank, disable
    assert_eq!(state.writes().len(), 4);
}

#[test]
fn test_clock_frame_end_to_end() {
    assert_eq!(format_hms(14, 5, 9), "  14 05 09  ");

    let transport = MockTransport::new();
    let clock = FixedClock(NaiveTime::from_hms_opt(14, 5, 9).unwrap());
    let config = Config {
        clock: Some(ClockConfig { refresh_ms: Some(10) }),
        ..Default::default()
    };
    let mut plugin = VfdClockPlugin::with_clock(transport.clone(), clock, &config);

    let token = StopToken::new();
    let host = ThreadHost::new(token.clone());
    plugin.init(&host).unwrap();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        token.request_stop();
    });
    plugin.run(&host);
    stopper.join().unwrap();

    let writes = transport.state().lock().unwrap().writes();
    assert_eq!(writes[2], text_frame(b"  14 05 09  "));
    assert_eq!(writes[2][0], 10);
}

#[test]
fn test_stop_mid_loop_blanks_within_one_interval() {
    let interval = Duration::from_millis(200);
    let transport = MockTransport::new();
    let config = Config {
        clock: Some(ClockConfig { refresh_ms: Some(interval.as_millis() as u64) }),
        ..Default::default()
    };
    let mut plugin = VfdClockPlugin::new(transport.clone(), &config);

    let token = StopToken::new();
    let host = ThreadHost::new(token.clone());
    plugin.init(&host).unwrap();

    let service_host = host.clone();
    let service = thread::spawn(move || {
        plugin.run(&service_host);
        plugin
    });

    thread::sleep(Duration::from_millis(450));
    let requested = Instant::now();
    token.request_stop();
    let mut plugin = service.join().unwrap();
    let latency = requested.elapsed();

    // one interval plus scheduling slack
    assert!(latency <= interval + Duration::from_millis(150), "stop took {:?}", latency);

    {
        let writes = transport.state().lock().unwrap().writes();
        let n = writes.len();
        assert!(n >= 5, "expected a few clock frames, got {} writes", n);
        assert_eq!(writes[n - 2], text_frame(b"            "));
        assert_eq!(writes[n - 1], vec![REG_CONTROL, 0]);
    }

    plugin.cleanup(&host);
    assert_eq!(transport.state().lock().unwrap().open_sessions, 0);
}
