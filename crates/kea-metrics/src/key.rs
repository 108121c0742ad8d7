// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Raw statistic key grammar
//!
//! Kea qualifies a statistic by where it was counted:
//!
//! | scope  | key                                   |
//! |--------|---------------------------------------|
//! | server | `<name>`                              |
//! | subnet | `subnet[<id>].<name>`                 |
//! | pool   | `subnet[<id>].pool[<index>].<name>`   |
//!
//! A pool is addressed by its position in the subnet's `pools` list, not by
//! any identifier of its own.

use std::fmt;

/// Where a statistic was counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticScope {
    /// Server wide
    Server,
    /// One subnet
    Subnet {
        /// Subnet id
        subnet_id: u32,
    },
    /// One pool of a subnet
    Pool {
        /// Subnet id
        subnet_id: u32,
        /// Position of the pool in the subnet's pool list
        pool_index: usize,
    },
}

impl StatisticScope {
    /// Scope for an optional (subnet id, pool index) qualification
    pub fn from_parts(subnet_id: Option<u32>, pool_index: Option<usize>) -> Self {
        match (subnet_id, pool_index) {
            (None, _) => StatisticScope::Server,
            (Some(subnet_id), None) => StatisticScope::Subnet { subnet_id },
            (Some(subnet_id), Some(pool_index)) => StatisticScope::Pool {
                subnet_id,
                pool_index,
            },
        }
    }

    /// Raw key of statistic `base` in this scope
    pub fn key(&self, base: &str) -> String {
        StatisticKey { scope: *self, base }.to_string()
    }
}

/// Displayable raw key
#[derive(Debug, Clone, Copy)]
pub struct StatisticKey<'a> {
    /// Qualification
    pub scope: StatisticScope,
    /// Statistic base name, used as is
    pub base: &'a str,
}

impl fmt::Display for StatisticKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            StatisticScope::Server => f.write_str(self.base),
            StatisticScope::Subnet { subnet_id } => {
                write!(f, "subnet[{}].{}", subnet_id, self.base)
            }
            StatisticScope::Pool {
                subnet_id,
                pool_index,
            } => write!(f, "subnet[{}].pool[{}].{}", subnet_id, pool_index, self.base),
        }
    }
}

/// Raw key of `base` for an optional subnet id and pool index
pub fn statistic_key(base: &str, subnet_id: Option<u32>, pool_index: Option<usize>) -> String {
    StatisticScope::from_parts(subnet_id, pool_index).key(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_key_is_verbatim() {
        assert_eq!(statistic_key("pkt4-ack-sent", None, None), "pkt4-ack-sent");
        assert_eq!(statistic_key("", None, None), "");
    }

    #[test]
    fn test_subnet_key() {
        assert_eq!(
            statistic_key("assigned-addresses", Some(10), None),
            "subnet[10].assigned-addresses"
        );
    }

    #[test]
    fn test_pool_key() {
        assert_eq!(
            statistic_key("assigned-addresses", Some(10), Some(0)),
            "subnet[10].pool[0].assigned-addresses"
        );
    }

    #[test]
    fn test_pool_index_without_subnet_is_server_scope() {
        assert_eq!(statistic_key("total-nas", None, Some(3)), "total-nas");
    }

    #[test]
    fn test_keys_differ_only_in_numbers() {
        let a = StatisticScope::Pool {
            subnet_id: 1,
            pool_index: 2,
        }
        .key("total-addresses");
        let b = StatisticScope::Pool {
            subnet_id: 4012,
            pool_index: 17,
        }
        .key("total-addresses");

        let strip = |s: &str| s.chars().filter(|c| !c.is_ascii_digit()).collect::<String>();
        assert_ne!(a, b);
        assert_eq!(strip(&a), strip(&b));
    }

    #[test]
    fn test_base_name_not_validated() {
        assert_eq!(
            StatisticScope::Subnet { subnet_id: 0 }.key("weird name.[x]"),
            "subnet[0].weird name.[x]"
        );
    }
}
