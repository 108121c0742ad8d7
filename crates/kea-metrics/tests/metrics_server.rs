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
//! End-to-end scrapes of the metrics endpoint

use kea_client::mock::MockClient;
use kea_client::{DhcpVersion, Pool, RawStatistics, Subnet, TargetClient};
use kea_metrics::{CollectionEngine, MetricTable, MetricsConfig, MetricsServer};
use tokio::net::TcpListener;

fn dhcp4_client() -> MockClient {
    MockClient::new("/run/kea/kea4-ctrl-socket").with_daemon(
        DhcpVersion::Dhcp4,
        "edge-1",
        vec![Subnet {
            id: 10,
            subnet: "10.0.0.0/24".to_string(),
            pools: vec![Pool {
                pool: "10.0.0.10-10.0.0.20".to_string(),
            }],
        }],
        RawStatistics::new()
            .with_value("pkt4-ack-sent", 12.0)
            .with_value("subnet[10].pool[0].assigned-addresses", 5.0),
    )
}

async fn spawn_server(targets: Vec<Box<dyn TargetClient>>) -> String {
    let engine = CollectionEngine::new(targets, MetricTable::kea().unwrap());
    let server = MetricsServer::new(engine, MetricsConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve_on(listener).await;
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let base = spawn_server(vec![Box::new(dhcp4_client())]).await;

    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.unwrap();
    assert!(body.contains("# TYPE kea_dhcp4_packets_sent_total gauge"));
    assert!(body.contains(concat!(
        r#"kea_dhcp4_packets_sent_total{operation="ack",server_tag="edge-1","#,
        r#"target="/run/kea/kea4-ctrl-socket"} 12"#
    )));
    assert!(body.contains(concat!(
        r#"kea_dhcp4_addresses_assigned_total{pool="10.0.0.10-10.0.0.20",server_tag="edge-1","#,
        r#"subnet="10.0.0.0/24",subnet_id="10",target="/run/kea/kea4-ctrl-socket"} 5"#
    )));
    assert!(!body.contains("kea_dhcp6_"));
    assert!(!body.contains("kea_dhcp4_addresses_total"));
}

#[tokio::test]
async fn test_consecutive_scrapes_are_identical() {
    let base = spawn_server(vec![Box::new(dhcp4_client())]).await;
    let url = format!("{}/metrics", base);

    let first = reqwest::get(&url).await.unwrap().text().await.unwrap();
    let second = reqwest::get(&url).await.unwrap().text().await.unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failing_target_yields_absent_series() {
    let broken = MockClient::new("http://kea-ca:8000/").with_daemon(
        DhcpVersion::Dhcp6,
        "",
        vec![],
        RawStatistics::new().with_value("pkt6-reply-sent", 3.0),
    );
    broken.fail_configuration(true);

    let base = spawn_server(vec![Box::new(dhcp4_client()), Box::new(broken)]).await;
    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("kea_dhcp4_packets_sent_total"));
    assert!(!body.contains("http://kea-ca:8000/"));
}

#[tokio::test]
async fn test_statistics_changes_show_in_next_scrape() {
    let client = dhcp4_client();
    let base = spawn_server(vec![Box::new(client.clone())]).await;
    let url = format!("{}/metrics", base);

    let before = reqwest::get(&url).await.unwrap().text().await.unwrap();
    assert!(before.contains("kea_dhcp4_addresses_assigned_total"));

    client.set_statistics(0, RawStatistics::new().with_value("pkt4-ack-sent", 13.0));
    let after = reqwest::get(&url).await.unwrap().text().await.unwrap();
    assert!(after.contains(r#"operation="ack""#));
    assert!(after.contains("} 13"));
    assert!(!after.contains("kea_dhcp4_addresses_assigned_total"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_server(vec![]).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_concurrent_scrapes() {
    let client = dhcp4_client();
    let base = spawn_server(vec![Box::new(client.clone())]).await;
    let url = format!("{}/metrics", base);

    let (a, b) = tokio::join!(reqwest::get(&url), reqwest::get(&url));
    let a = a.unwrap().text().await.unwrap();
    let b = b.unwrap().text().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(client.calls().len(), 4);
}
