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
//! Collection engine
//!
//! One pass per scrape: every target client is asked for fresh
//! configuration and statistics, then each declared family is filled by
//! constructing raw keys for the target's subnets and pools and looking
//! them up in its statistics snapshot.
//!
//! Label values are merged base identity first, then subnet and pool, then
//! the mapping entry's extra labels, later values replacing earlier ones.

use futures::future::join_all;
use kea_client::{Subnet, TargetClient, TargetSnapshot};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::family::MetricFamily;
use crate::key::StatisticScope;
use crate::table::{
    MappedStatistic, MetricDeclaration, MetricScope, MetricTable, POOL_LABEL, SERVER_TAG_LABEL,
    SUBNET_ID_LABEL, SUBNET_LABEL, TARGET_LABEL,
};

type Labels = HashMap<&'static str, String>;

/// Polls targets and maps their statistics onto metric families
///
/// Each client sits behind its own lock, so overlapping scrapes are
/// serialised per target while distinct targets are fetched concurrently.
#[derive(Debug)]
pub struct CollectionEngine {
    targets: Vec<Mutex<Box<dyn TargetClient>>>,
    table: MetricTable,
}

impl CollectionEngine {
    /// Create an engine over clients that were constructed successfully
    pub fn new(targets: Vec<Box<dyn TargetClient>>, table: MetricTable) -> Self {
        Self {
            targets: targets.into_iter().map(Mutex::new).collect(),
            table,
        }
    }

    /// Number of active targets
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Declarations this engine fills
    pub fn table(&self) -> &MetricTable {
        &self.table
    }

    /// Run one collection pass
    ///
    /// A target whose fetch fails contributes nothing to this pass; the
    /// next pass tries it again.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let snapshots = self.snapshots().await;
        let families = map_snapshots(&self.table, &snapshots);
        debug!(
            daemons = snapshots.len(),
            families = families.len(),
            "Collection pass complete"
        );
        families
    }

    async fn snapshots(&self) -> Vec<TargetSnapshot> {
        let fetches = self.targets.iter().map(|client| async move {
            let client = client.lock().await;
            match client.collect().await {
                Ok(snapshots) => snapshots,
                Err(e) => {
                    warn!(endpoint = %client.target(), error = %e, "Failed to collect from target");
                    Vec::new()
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }
}

/// Fill every declared family from the given snapshots
///
/// Server scope families come first, then subnet scope, each in declaration
/// order. Families without samples are left out.
pub fn map_snapshots(table: &MetricTable, snapshots: &[TargetSnapshot]) -> Vec<MetricFamily> {
    table
        .with_scope(MetricScope::Server)
        .chain(table.with_scope(MetricScope::Subnet))
        .map(|declaration| map_declaration(declaration, snapshots))
        .filter(|family| !family.is_empty())
        .collect()
}

fn map_declaration(declaration: &MetricDeclaration, snapshots: &[TargetSnapshot]) -> MetricFamily {
    let mut family = MetricFamily::from_declaration(declaration);
    let with_pools = declaration.has_label(POOL_LABEL);

    for mapped in declaration.statistics {
        for snapshot in snapshots.iter().filter(|s| s.version == declaration.version) {
            let base = base_labels(snapshot);
            match declaration.scope {
                MetricScope::Server => {
                    record(&mut family, snapshot, mapped, StatisticScope::Server, base);
                }
                MetricScope::Subnet => {
                    for subnet in &snapshot.subnets {
                        map_subnet(&mut family, snapshot, mapped, subnet, &base, with_pools);
                    }
                }
            }
        }
    }

    family
}

fn map_subnet(
    family: &mut MetricFamily,
    snapshot: &TargetSnapshot,
    mapped: &MappedStatistic,
    subnet: &Subnet,
    base: &Labels,
    with_pools: bool,
) {
    let mut labels = base.clone();
    labels.insert(SUBNET_LABEL, subnet.subnet.clone());
    labels.insert(SUBNET_ID_LABEL, subnet.id.to_string());

    let scope = StatisticScope::Subnet {
        subnet_id: subnet.id,
    };
    record(family, snapshot, mapped, scope, labels.clone());

    if !with_pools {
        return;
    }
    for (pool_index, pool) in subnet.pools.iter().enumerate() {
        let mut labels = labels.clone();
        labels.insert(POOL_LABEL, pool.pool.clone());
        let scope = StatisticScope::Pool {
            subnet_id: subnet.id,
            pool_index,
        };
        record(family, snapshot, mapped, scope, labels);
    }
}

fn base_labels(snapshot: &TargetSnapshot) -> Labels {
    HashMap::from([
        (TARGET_LABEL, snapshot.target.clone()),
        (SERVER_TAG_LABEL, snapshot.server_tag.clone()),
    ])
}

fn record(
    family: &mut MetricFamily,
    snapshot: &TargetSnapshot,
    mapped: &MappedStatistic,
    scope: StatisticScope,
    mut labels: Labels,
) {
    let key = scope.key(mapped.statistic);
    let Some(value) = snapshot.statistics.latest(&key) else {
        trace!(endpoint = %snapshot.target, statistic = %key, "Statistic not reported");
        return;
    };

    for (name, label_value) in mapped.labels.iter() {
        labels.insert(*name, label_value.to_string());
    }
    family.add_sample(&labels, value);
}
