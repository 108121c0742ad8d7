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
//! Metric mapping table
//!
//! Declares every exported family together with the raw Kea statistics that
//! feed it. Supporting a new statistic means adding a declaration here; the
//! collection engine only walks the table.

use kea_client::DhcpVersion;
use std::collections::HashSet;

use crate::error::{MetricsError, MetricsResult};

/// Label carrying the target identifier
pub const TARGET_LABEL: &str = "target";
/// Label carrying the server tag
pub const SERVER_TAG_LABEL: &str = "server_tag";
/// Label carrying the subnet prefix
pub const SUBNET_LABEL: &str = "subnet";
/// Label carrying the subnet id
pub const SUBNET_ID_LABEL: &str = "subnet_id";
/// Label carrying the pool range
pub const POOL_LABEL: &str = "pool";

const SERVER_LABELS: &[&str] = &[TARGET_LABEL, SERVER_TAG_LABEL, "operation"];
const SUBNET_LABELS: &[&str] = &[TARGET_LABEL, SERVER_TAG_LABEL, SUBNET_LABEL, SUBNET_ID_LABEL];
const POOL_LABELS: &[&str] = &[
    TARGET_LABEL,
    SERVER_TAG_LABEL,
    SUBNET_LABEL,
    SUBNET_ID_LABEL,
    POOL_LABEL,
];
const ALLOCATION_LABELS: &[&str] = &[
    TARGET_LABEL,
    SERVER_TAG_LABEL,
    SUBNET_LABEL,
    SUBNET_ID_LABEL,
    "context",
];

/// Dimension a family is evaluated over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricScope {
    /// Once per daemon
    Server,
    /// Once per subnet, and per pool when the family has a `pool` label
    Subnet,
}

/// Raw statistic feeding a family, with the labels it contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedStatistic {
    /// Statistic base name
    pub statistic: &'static str,
    /// Extra labels attached to samples of this statistic
    pub labels: &'static [(&'static str, &'static str)],
}

/// Declaration of one exported family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDeclaration {
    /// Family name
    pub name: &'static str,
    /// Help text
    pub help: &'static str,
    /// Protocol variant whose daemons feed this family
    pub version: DhcpVersion,
    /// Evaluation dimension
    pub scope: MetricScope,
    /// Label names, in exposition order
    pub labels: &'static [&'static str],
    /// Statistics feeding the family
    pub statistics: &'static [MappedStatistic],
}

impl MetricDeclaration {
    /// Whether the family declares `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(&label)
    }
}

macro_rules! stat {
    ($statistic:literal) => {
        MappedStatistic {
            statistic: $statistic,
            labels: &[],
        }
    };
    ($statistic:literal, $key:ident = $value:literal) => {
        MappedStatistic {
            statistic: $statistic,
            labels: &[(stringify!($key), $value)],
        }
    };
}

macro_rules! metric {
    (
        $name:literal,
        $help:literal,
        $version:ident,
        $scope:ident,
        $labels:expr,
        [$($stat:expr),+ $(,)?]
    ) => {
        MetricDeclaration {
            name: $name,
            help: $help,
            version: DhcpVersion::$version,
            scope: MetricScope::$scope,
            labels: $labels,
            statistics: &[$($stat),+],
        }
    };
}

/// Every family exported for Kea
pub static KEA_METRICS: &[MetricDeclaration] = &[
    // DHCPv4 server
    metric!(
        "kea_dhcp4_packets_sent_total",
        "Packets sent",
        Dhcp4,
        Server,
        SERVER_LABELS,
        [
            stat!("pkt4-ack-sent", operation = "ack"),
            stat!("pkt4-nak-sent", operation = "nak"),
            stat!("pkt4-offer-sent", operation = "offer"),
        ]
    ),
    metric!(
        "kea_dhcp4_packets_received_total",
        "Packets received",
        Dhcp4,
        Server,
        SERVER_LABELS,
        [
            stat!("pkt4-discover-received", operation = "discover"),
            stat!("pkt4-offer-received", operation = "offer"),
            stat!("pkt4-request-received", operation = "request"),
            stat!("pkt4-ack-received", operation = "ack"),
            stat!("pkt4-nak-received", operation = "nak"),
            stat!("pkt4-release-received", operation = "release"),
            stat!("pkt4-decline-received", operation = "decline"),
            stat!("pkt4-inform-received", operation = "inform"),
            stat!("pkt4-unknown-received", operation = "unknown"),
            stat!("pkt4-parse-failed", operation = "parse-failed"),
            stat!("pkt4-receive-drop", operation = "drop"),
        ]
    ),
    // DHCPv6 server
    metric!(
        "kea_dhcp6_packets_sent_total",
        "Packets sent",
        Dhcp6,
        Server,
        SERVER_LABELS,
        [
            stat!("pkt6-advertise-sent", operation = "advertise"),
            stat!("pkt6-reply-sent", operation = "reply"),
        ]
    ),
    metric!(
        "kea_dhcp6_packets_received_total",
        "Packets received",
        Dhcp6,
        Server,
        SERVER_LABELS,
        [
            stat!("pkt6-receive-drop", operation = "drop"),
            stat!("pkt6-parse-failed", operation = "parse-failed"),
            stat!("pkt6-solicit-received", operation = "solicit"),
            stat!("pkt6-advertise-received", operation = "advertise"),
            stat!("pkt6-request-received", operation = "request"),
            stat!("pkt6-reply-received", operation = "reply"),
            stat!("pkt6-renew-received", operation = "renew"),
            stat!("pkt6-rebind-received", operation = "rebind"),
            stat!("pkt6-release-received", operation = "release"),
            stat!("pkt6-decline-received", operation = "decline"),
            stat!("pkt6-infrequest-received", operation = "infrequest"),
            stat!("pkt6-unknown-received", operation = "unknown"),
        ]
    ),
    metric!(
        "kea_dhcp6_packets_sent_dhcp4_total",
        "DHCPv4-over-DHCPv6 Packets sent",
        Dhcp6,
        Server,
        SERVER_LABELS,
        [
            stat!("pkt6-dhcpv4-response-sent", operation = "response"),
        ]
    ),
    metric!(
        "kea_dhcp6_packets_received_dhcp4_total",
        "DHCPv4-over-DHCPv6 Packets received",
        Dhcp6,
        Server,
        SERVER_LABELS,
        [
            stat!("pkt6-dhcpv4-query-received", operation = "query"),
            stat!("pkt6-dhcpv4-response-received", operation = "response"),
        ]
    ),
    // DHCPv4 subnets
    metric!(
        "kea_dhcp4_allocations_failed_total",
        "Allocation fail count",
        Dhcp4,
        Subnet,
        ALLOCATION_LABELS,
        [
            stat!("v4-allocation-fail-subnet", context = "subnet"),
            stat!("v4-allocation-fail-shared-network", context = "shared-network"),
            stat!("v4-allocation-fail-no-pools", context = "no-pools"),
            stat!("v4-allocation-fail-classes", context = "classes"),
        ]
    ),
    metric!(
        "kea_dhcp4_leases_reused_total",
        "Number of times an IPv4 lease has been renewed in memory",
        Dhcp4,
        Subnet,
        SUBNET_LABELS,
        [
            stat!("v4-lease-reuses"),
        ]
    ),
    metric!(
        "kea_dhcp4_addresses_assigned_total",
        "Assigned addresses",
        Dhcp4,
        Subnet,
        POOL_LABELS,
        [
            stat!("assigned-addresses"),
        ]
    ),
    metric!(
        "kea_dhcp4_addresses_declined_total",
        "Declined counts",
        Dhcp4,
        Subnet,
        POOL_LABELS,
        [
            stat!("declined-addresses"),
        ]
    ),
    metric!(
        "kea_dhcp4_addresses_declined_reclaimed_total",
        "Declined addresses that were reclaimed",
        Dhcp4,
        Subnet,
        POOL_LABELS,
        [
            stat!("reclaimed-declined-addresses"),
        ]
    ),
    metric!(
        "kea_dhcp4_addresses_reclaimed_total",
        "Expired addresses that were reclaimed",
        Dhcp4,
        Subnet,
        POOL_LABELS,
        [
            stat!("reclaimed-leases"),
        ]
    ),
    metric!(
        "kea_dhcp4_addresses_total",
        "Size of subnet address pool",
        Dhcp4,
        Subnet,
        POOL_LABELS,
        [
            stat!("total-addresses"),
        ]
    ),
    metric!(
        "kea_dhcp4_reservation_conflicts_total",
        "Reservation conflict count",
        Dhcp4,
        Subnet,
        SUBNET_LABELS,
        [
            stat!("v4-reservation-conflicts"),
        ]
    ),
    // DHCPv6 subnets
    metric!(
        "kea_dhcp6_allocations_failed_total",
        "Allocation fail count",
        Dhcp6,
        Subnet,
        ALLOCATION_LABELS,
        [
            stat!("v6-allocation-fail-shared-network", context = "shared-network"),
            stat!("v6-allocation-fail-subnet", context = "subnet"),
            stat!("v6-allocation-fail-no-pools", context = "no-pools"),
            stat!("v6-allocation-fail-classes", context = "classes"),
        ]
    ),
    metric!(
        "kea_dhcp6_na_assigned_total",
        "Assigned non-temporary addresses (IA_NA)",
        Dhcp6,
        Subnet,
        POOL_LABELS,
        [
            stat!("assigned-nas"),
        ]
    ),
    metric!(
        "kea_dhcp6_pd_assigned_total",
        "Assigned prefix delegations (IA_PD)",
        Dhcp6,
        Subnet,
        SUBNET_LABELS,
        [
            stat!("assigned-pds"),
        ]
    ),
    metric!(
        "kea_dhcp6_addresses_declined_total",
        "Declined addresses",
        Dhcp6,
        Subnet,
        POOL_LABELS,
        [
            stat!("declined-addresses"),
        ]
    ),
    // Kea versions disagree on this name; whichever is present is exported.
    metric!(
        "kea_dhcp6_addresses_declined_reclaimed_total",
        "Declined addresses that were reclaimed",
        Dhcp6,
        Subnet,
        POOL_LABELS,
        [
            stat!("declined-reclaimed-addresses"),
            stat!("reclaimed-declined-addresses"),
        ]
    ),
    metric!(
        "kea_dhcp6_addresses_reclaimed_total",
        "Expired addresses that were reclaimed",
        Dhcp6,
        Subnet,
        POOL_LABELS,
        [
            stat!("reclaimed-leases"),
        ]
    ),
    metric!(
        "kea_dhcp6_na_total",
        "Size of non-temporary address pool",
        Dhcp6,
        Subnet,
        POOL_LABELS,
        [
            stat!("total-nas"),
        ]
    ),
    metric!(
        "kea_dhcp6_pd_total",
        "Size of prefix delegation pool",
        Dhcp6,
        Subnet,
        SUBNET_LABELS,
        [
            stat!("total-pds"),
        ]
    ),
    metric!(
        "kea_dhcp6_reservation_conflicts_total",
        "Reservation conflict count",
        Dhcp6,
        Subnet,
        SUBNET_LABELS,
        [
            stat!("v6-reservation-conflicts"),
        ]
    ),
    metric!(
        "kea_dhcp6_na_reuses_total",
        "Number of IA_NA lease reuses",
        Dhcp6,
        Subnet,
        POOL_LABELS,
        [
            stat!("v6-ia-na-lease-reuses"),
        ]
    ),
    metric!(
        "kea_dhcp6_pd_reuses_total",
        "Number of IA_PD lease reuses",
        Dhcp6,
        Subnet,
        POOL_LABELS,
        [
            stat!("v6-ia-pd-lease-reuses"),
        ]
    ),
];

/// Validated set of metric declarations
#[derive(Debug, Clone)]
pub struct MetricTable {
    declarations: Vec<MetricDeclaration>,
}

impl MetricTable {
    /// Validate and wrap a set of declarations
    ///
    /// # Errors
    ///
    /// `InvalidMetricTable` naming the first declaration that has an invalid
    /// or duplicate name, lacks the labels its scope requires, or maps a
    /// statistic onto a label it does not declare.
    pub fn new(declarations: &[MetricDeclaration]) -> MetricsResult<Self> {
        let mut names = HashSet::new();
        for declaration in declarations {
            validate(declaration)?;
            if !names.insert(declaration.name) {
                return Err(MetricsError::invalid_table(
                    declaration.name,
                    "declared more than once",
                ));
            }
        }

        Ok(Self {
            declarations: declarations.to_vec(),
        })
    }

    /// Table of every Kea family
    pub fn kea() -> MetricsResult<Self> {
        Self::new(KEA_METRICS)
    }

    /// All declarations, in declaration order
    pub fn declarations(&self) -> &[MetricDeclaration] {
        &self.declarations
    }

    /// Declarations of the given scope
    pub fn with_scope(&self, scope: MetricScope) -> impl Iterator<Item = &MetricDeclaration> {
        self.declarations.iter().filter(move |d| d.scope == scope)
    }

    /// Look up a declaration by family name
    pub fn get(&self, name: &str) -> Option<&MetricDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Number of declared families
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether no family is declared
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

fn validate(declaration: &MetricDeclaration) -> MetricsResult<()> {
    let fail = |reason: String| Err(MetricsError::invalid_table(declaration.name, reason));

    if !is_valid_metric_name(declaration.name) {
        return fail("not a valid Prometheus metric name".to_string());
    }
    if declaration.statistics.is_empty() {
        return fail("no statistics mapped".to_string());
    }

    let mut seen = HashSet::new();
    for label in declaration.labels {
        if !is_valid_label_name(label) {
            return fail(format!("'{}' is not a valid label name", label));
        }
        if !seen.insert(*label) {
            return fail(format!("label '{}' declared twice", label));
        }
    }

    for required in [TARGET_LABEL, SERVER_TAG_LABEL] {
        if !declaration.has_label(required) {
            return fail(format!("missing label '{}'", required));
        }
    }

    let dimensional = [SUBNET_LABEL, SUBNET_ID_LABEL, POOL_LABEL];
    match declaration.scope {
        MetricScope::Server => {
            if let Some(label) = dimensional.iter().find(|l| declaration.has_label(l)) {
                return fail(format!("server scope cannot carry label '{}'", label));
            }
        }
        MetricScope::Subnet => {
            for required in [SUBNET_LABEL, SUBNET_ID_LABEL] {
                if !declaration.has_label(required) {
                    return fail(format!("missing label '{}'", required));
                }
            }
        }
    }

    for mapped in declaration.statistics {
        for (key, _) in mapped.labels {
            if !declaration.has_label(key) {
                return fail(format!(
                    "statistic '{}' sets undeclared label '{}'",
                    mapped.statistic, key
                ));
            }
        }
    }

    Ok(())
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with("__")
}
