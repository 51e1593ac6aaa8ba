/// A named Dell iDRAC status object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOid {
    pub name: &'static str,
    pub oid: &'static str,
}

const fn status(name: &'static str, oid: &'static str) -> StatusOid {
    StatusOid { name, oid }
}

/// Polled objects, in output order. Values follow the iDRAC `ObjectStatusEnum`
/// (1 other, 2 unknown, 3 ok, 4 non-critical, 5 critical, 6 non-recoverable),
/// except `power_state`.
pub const STATUS_OIDS: [StatusOid; 12] = [
    // globalSystemStatus, globalStorageStatus, systemPowerState
    status("glob_system_status", ".1.3.6.1.4.1.674.10892.5.2.1.0"),
    status("glob_storage_status", ".1.3.6.1.4.1.674.10892.5.2.3.0"),
    status("power_state", ".1.3.6.1.4.1.674.10892.5.2.4.0"),
    // systemStateTable, chassis 1
    status("comb_power_supply", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.9.1"),
    status("comb_voltage", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.12.1"),
    status("comb_cooling_dev", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.21.1"),
    status("comb_temperature", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.24.1"),
    status("comb_memory", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.27.1"),
    status("comb_cooling_unit", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.44.1"),
    status("comb_processor", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.50.1"),
    status("comb_battery", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.52.1"),
    status("comb_sdcard", ".1.3.6.1.4.1.674.10892.5.4.200.10.1.54.1"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_engine::parse_oid;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = STATUS_OIDS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), STATUS_OIDS.len());
    }

    #[test]
    fn every_oid_parses() {
        for status in STATUS_OIDS.iter() {
            assert!(parse_oid(status.oid).is_ok(), "{}", status.name);
        }
    }
}
