//! Reachability value objects

use serde::{Deserialize, Serialize};

/// Connectivity transition reported by the platform's reachability monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityChange {
    /// A network interface is up
    pub connected: bool,
    /// That network actually reaches the internet
    pub internet_reachable: bool,
}

impl ConnectivityChange {
    pub fn is_online(&self) -> bool {
        self.connected && self.internet_reachable
    }
}

/// Online/offline state tracked by the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachabilityState {
    Online,
    Offline,
}

impl From<bool> for ReachabilityState {
    fn from(is_online: bool) -> Self {
        if is_online {
            ReachabilityState::Online
        } else {
            ReachabilityState::Offline
        }
    }
}

impl From<ConnectivityChange> for ReachabilityState {
    fn from(change: ConnectivityChange) -> Self {
        change.is_online().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_requires_both_signals() {
        let cases = [
            (true, true, ReachabilityState::Online),
            (true, false, ReachabilityState::Offline),
            (false, true, ReachabilityState::Offline),
            (false, false, ReachabilityState::Offline),
        ];

        for (connected, internet_reachable, expected) in cases {
            let change = ConnectivityChange {
                connected,
                internet_reachable,
            };
            assert_eq!(ReachabilityState::from(change), expected);
        }
    }
}
