/*
 *  transport/mock.rs
 *
 *  vfdclock - time on glass
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock I2C transport for testing without hardware
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use super::{I2cDevice, I2cTransport, TransportError};

/// One recorded bus operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Open { bus: u8, address: u8, speed_hz: u32 },
    Write { address: u8, bytes: Vec<u8> },
    Close { address: u8 },
}

/// Internal state for the mock transport (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockTransportState {
    /// Every open/write/close in the order it happened
    pub events: Vec<TransportEvent>,

    /// Number of probe() calls
    pub probe_count: usize,

    /// (bus, address) pairs that acknowledge a probe
    pub responsive: HashSet<(u8, u8)>,

    /// Number of sessions currently open
    pub open_sessions: usize,

    /// Simulate failures (for error testing)
    pub simulate_open_failure: bool,
    pub simulate_write_failure: bool,
}

impl MockTransportState {
    /// Payloads of every write, oldest first
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TransportEvent::Write { bytes, .. } => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.writes().pop()
    }

    pub fn open_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, TransportEvent::Open { .. })).count()
    }

    pub fn close_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, TransportEvent::Close { .. })).count()
    }
}

fn lock(state: &Mutex<MockTransportState>) -> MutexGuard<'_, MockTransportState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock transport
///
/// Clones share the same state, so a test can hand one copy to the driver
/// and keep another to inspect the traffic afterwards.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose open() always fails
    pub fn failing_open() -> Self {
        let transport = Self::new();
        lock(&transport.state).simulate_open_failure = true;
        transport
    }

    /// Make `address` on `bus` acknowledge probes
    pub fn respond_at(&mut self, bus: u8, address: u8) {
        lock(&self.state).responsive.insert((bus, address));
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockTransportState>> {
        Arc::clone(&self.state)
    }
}

impl I2cTransport for MockTransport {
    type Device = MockDevice;

    fn probe(&mut self, bus: u8, address: u8) -> bool {
        let mut state = lock(&self.state);
        state.probe_count += 1;
        state.responsive.contains(&(bus, address))
    }

    fn open(&mut self, bus: u8, address: u8, speed_hz: u32) -> Result<MockDevice, TransportError> {
        let mut state = lock(&self.state);

        if state.simulate_open_failure {
            return Err(TransportError::Open {
                bus,
                reason: "Simulated open failure".to_string(),
            });
        }

        state.events.push(TransportEvent::Open { bus, address, speed_hz });
        state.open_sessions += 1;

        Ok(MockDevice {
            address,
            state: Arc::clone(&self.state),
        })
    }
}

/// Session handle returned by [`MockTransport::open`]
#[derive(Debug)]
pub struct MockDevice {
    address: u8,
    state: Arc<Mutex<MockTransportState>>,
}

impl I2cDevice for MockDevice {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut state = lock(&self.state);

        if state.simulate_write_failure {
            return Err(TransportError::Write {
                address: self.address,
                reason: "Simulated write failure".to_string(),
            });
        }

        debug!("mock write 0x{:02X}: {:?}", self.address, String::from_utf8_lossy(bytes));
        state.events.push(TransportEvent::Write {
            address: self.address,
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn close(self) {
        let mut state = lock(&self.state);
        state.events.push(TransportEvent::Close { address: self.address });
        state.open_sessions = state.open_sessions.saturating_sub(1);
    }
}
