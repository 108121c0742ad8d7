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
//! Prometheus text exposition of collected families
//!
//! A fresh registry is built for every scrape and dropped afterwards, so
//! series that stop being reported disappear from the next scrape.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::error::MetricsResult;
use crate::family::MetricFamily;

/// Content type of [`encode_text`] output
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Build a throw-away registry holding one gauge family per input family
pub fn build_registry(families: &[MetricFamily]) -> MetricsResult<Registry> {
    let registry = Registry::new();

    for family in families {
        let label_names: Vec<&str> = family.label_names().iter().map(String::as_str).collect();
        let gauge = GaugeVec::new(Opts::new(family.name(), family.help()), &label_names)?;

        for (values, value) in family.samples() {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            gauge.get_metric_with_label_values(&values)?.set(value);
        }
        registry.register(Box::new(gauge))?;
    }

    Ok(registry)
}

/// Encode families in the Prometheus text format
pub fn encode_text(families: &[MetricFamily]) -> MetricsResult<String> {
    let registry = build_registry(families)?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
