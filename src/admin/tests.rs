use serde_json::{Value, json};

use super::{AdminConnection, AdminEvent};
use crate::model::{Config, Message, Route, RouteEndpoint};
use crate::transport::TransportEvent;
use crate::transport::mock::MockTransport;
use crate::utils::{RouteSide, SpacebrewError};

fn admin() -> AdminConnection<MockTransport> {
    AdminConnection::new(MockTransport::default(), "localhost", "admin", "route admin")
}

fn connected_admin() -> AdminConnection<MockTransport> {
    let mut admin = admin();
    admin.connect();
    admin
        .connection_mut()
        .transport_mut()
        .push(TransportEvent::Connected);
    admin.poll_at(0);
    admin.connection_mut().transport_mut().take_writes();
    admin
}

fn config_frame(name: &str, address: &str, publish: &[(&str, &str)], subscribe: &[(&str, &str)]) -> Value {
    let publish: Vec<Value> = publish
        .iter()
        .map(|(n, t)| json!({"name": n, "type": t, "default": "0"}))
        .collect();
    let subscribe: Vec<Value> = subscribe
        .iter()
        .map(|(n, t)| json!({"name": n, "type": t}))
        .collect();
    json!({"config": {
        "name": name,
        "description": format!("{name} app"),
        "remoteAddress": address,
        "publish": {"messages": publish},
        "subscribe": {"messages": subscribe}
    }})
}

fn route_frame(action: &str, pub_client: &str, sub_client: &str) -> Value {
    json!({"route": {
        "type": action,
        "publisher": {"clientName": pub_client, "name": "temp", "remoteAddress": "10.0.0.1", "type": "range"},
        "subscriber": {"clientName": sub_client, "name": "temp", "remoteAddress": "10.0.0.2", "type": "range"}
    }})
}

fn temp_route() -> Route {
    Route::new(
        RouteEndpoint::new("A", "temp", "10.0.0.1"),
        RouteEndpoint::new("B", "temp", "10.0.0.2"),
    )
}

/// Registry holding publisher A (temp) and subscriber B (temp).
fn admin_with_clients() -> AdminConnection<MockTransport> {
    let mut admin = connected_admin();
    admin.process_incoming_json(&config_frame("A", "10.0.0.1", &[("temp", "range")], &[]));
    admin.process_incoming_json(&config_frame("B", "10.0.0.2", &[], &[("temp", "range")]));
    admin
}

#[test]
fn test_open_sends_config_then_admin_registration() {
    let mut admin = admin();
    admin.connect();
    admin
        .connection_mut()
        .transport_mut()
        .push(TransportEvent::Connected);

    assert_eq!(admin.poll_at(0), vec![AdminEvent::Connected]);
    let writes = admin.connection_mut().transport_mut().take_writes();
    assert_eq!(writes.len(), 2);
    assert!(writes[0].starts_with(r#"{"config":"#));
    assert_eq!(writes[1], r#"{"admin":[{"admin":true,"no_msgs":true}]}"#);
}

#[test]
fn test_new_config_fires_client_connected_once() {
    let mut admin = connected_admin();
    let events = admin.process_incoming_json(&config_frame("A", "10.0.0.1", &[("temp", "range")], &[]));

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], AdminEvent::ClientConnected(c) if c.name == "A"));
    assert_eq!(admin.connected_clients().len(), 1);
}

#[test]
fn test_reannounced_config_replaces_channels() {
    let mut admin = connected_admin();
    admin.process_incoming_json(&config_frame("A", "10.0.0.1", &[("temp", "range")], &[]));
    let events = admin.process_incoming_json(&config_frame("A", "10.0.0.1", &[("light", "boolean")], &[]));

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], AdminEvent::ClientUpdated(_)));
    assert_eq!(admin.connected_clients().len(), 1);
    let stored = &admin.connected_clients()[0];
    assert_eq!(stored.publish(), &[Message::new("light", "boolean", "0")]);
}

#[test]
fn test_same_name_other_address_is_new_client() {
    let mut admin = connected_admin();
    admin.process_incoming_json(&config_frame("A", "10.0.0.1", &[], &[]));
    let events = admin.process_incoming_json(&config_frame("A", "10.0.0.9", &[], &[]));
    assert!(matches!(&events[0], AdminEvent::ClientConnected(_)));
    assert_eq!(admin.connected_clients().len(), 2);
}

#[test]
fn test_own_announcement_adopts_remote_address() {
    let mut admin = connected_admin();
    admin.connection_mut().add_subscribe("temp", "range");

    let frame = json!({"config": {
        "name": "admin",
        "description": "route admin",
        "remoteAddress": "192.168.0.7",
        "publish": {"messages": []},
        "subscribe": {"messages": [{"name": "temp", "type": "range"}]}
    }});
    let events = admin.process_incoming_json(&frame);

    assert_eq!(admin.connection().config().remote_address, "192.168.0.7");
    assert!(matches!(&events[0], AdminEvent::ClientConnected(_)));
}

#[test]
fn test_own_announcement_matches_subscriber_with_value() {
    let mut admin = connected_admin();
    admin
        .connection_mut()
        .add_subscribe_message(Message::new("temp", "range", "5"));

    let frame = json!({"config": {
        "name": "admin",
        "description": "route admin",
        "remoteAddress": "192.168.0.7",
        "publish": {"messages": []},
        "subscribe": {"messages": [{"name": "temp", "type": "range"}]}
    }});
    admin.process_incoming_json(&frame);

    assert_eq!(admin.connection().config().remote_address, "192.168.0.7");
}

#[test]
fn test_other_client_does_not_touch_local_address() {
    let mut admin = connected_admin();
    admin.process_incoming_json(&config_frame("A", "10.0.0.1", &[], &[]));
    assert_eq!(admin.connection().config().remote_address, "");
}

#[test]
fn test_removal_notice_drops_matching_clients() {
    let mut admin = admin_with_clients();
    let events = admin.process_incoming_json(&json!({"remove": [
        {"name": "A", "remoteAddress": "10.0.0.1"},
        {"name": "ghost", "remoteAddress": "10.0.0.5"}
    ]}));

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], AdminEvent::ClientDisconnected(c) if c.name == "A"));
    assert_eq!(admin.connected_clients().len(), 1);
    assert_eq!(admin.connected_clients()[0].name, "B");
}

#[test]
fn test_route_add_and_remove_updates() {
    let mut admin = admin_with_clients();

    let events = admin.process_incoming_json(&route_frame("add", "A", "B"));
    assert_eq!(events, vec![AdminEvent::RouteAdded(temp_route())]);
    assert_eq!(admin.current_routes(), &[temp_route()]);

    let events = admin.process_incoming_json(&route_frame("remove", "A", "B"));
    assert_eq!(events, vec![AdminEvent::RouteRemoved(temp_route())]);
    assert!(admin.current_routes().is_empty());
}

#[test]
fn test_removing_unknown_route_is_silent() {
    let mut admin = admin_with_clients();
    admin.process_incoming_json(&route_frame("add", "A", "B"));

    let events = admin.process_incoming_json(&route_frame("remove", "A", "C"));
    assert!(events.is_empty());
    assert_eq!(admin.current_routes().len(), 1);
}

#[test]
fn test_array_payload_applies_each_update() {
    let mut admin = connected_admin();
    let payload = json!([
        config_frame("A", "10.0.0.1", &[("temp", "range")], &[]),
        config_frame("B", "10.0.0.2", &[], &[("temp", "range")])
    ]);
    let events = admin.handle_payload(&payload.to_string());
    assert_eq!(events.len(), 2);
    assert_eq!(admin.connected_clients().len(), 2);
}

#[test]
fn test_message_without_client_name_is_plain_data() {
    let mut admin = connected_admin();
    let events =
        admin.handle_payload(r#"{"message":{"name":"temp","type":"range","value":4}}"#);
    assert_eq!(events, vec![AdminEvent::Message(Message::range("temp", 4))]);
}

#[test]
fn test_message_with_client_name_is_admin_data() {
    let mut admin = connected_admin();
    let events = admin.handle_payload(
        r#"{"message":{"clientName":"A","remoteAddress":"10.0.0.1","name":"temp","type":"range","value":"4"}}"#,
    );
    let [AdminEvent::DataMessage(data)] = events.as_slice() else {
        panic!("expected one data message, got {events:?}");
    };
    assert_eq!(data.client_name, "A");
    assert_eq!(data.value, "4");
}

#[test]
fn test_malformed_payload_is_ignored() {
    let mut admin = admin_with_clients();
    assert!(admin.handle_payload("{{{").is_empty());
    assert!(admin.handle_payload(r#"{"config": "nope"}"#).is_empty());
    assert_eq!(admin.connected_clients().len(), 2);
}

#[test]
fn test_add_route_rejects_undeclared_publisher() {
    let mut admin = admin_with_clients();
    let result = admin.add_route("A", "10.0.0.1", "humidity", "B", "10.0.0.2", "temp");

    assert!(matches!(
        result,
        Err(SpacebrewError::InvalidRoute(RouteSide::Publisher))
    ));
    assert!(admin.connection().transport().writes.is_empty());
}

#[test]
fn test_add_route_rejects_undeclared_subscriber() {
    let mut admin = admin_with_clients();
    let result = admin.add_route("A", "10.0.0.1", "temp", "B", "10.0.0.2", "lamp");
    assert!(matches!(
        result,
        Err(SpacebrewError::InvalidRoute(RouteSide::Subscriber))
    ));

    let result = admin.add_route("X", "10.0.0.1", "temp", "B", "10.0.0.3", "temp");
    assert!(matches!(
        result,
        Err(SpacebrewError::InvalidRoute(RouteSide::Both))
    ));
    assert!(admin.connection().transport().writes.is_empty());
}

#[test]
fn test_add_route_within_one_client() {
    let mut admin = connected_admin();
    admin.process_incoming_json(&config_frame(
        "loop",
        "10.0.0.4",
        &[("out", "string")],
        &[("in", "string")],
    ));
    assert!(admin.add_route("loop", "10.0.0.4", "out", "loop", "10.0.0.4", "in").is_ok());
}

#[test]
fn test_add_route_does_not_touch_current_routes() {
    let mut admin = admin_with_clients();
    admin.add_route_for(&temp_route()).unwrap();
    assert!(admin.current_routes().is_empty());
    assert_eq!(admin.connection().transport().writes.len(), 1);
}

#[test]
fn test_add_route_while_disconnected_fails() {
    let mut admin = admin();
    admin.process_incoming_json(&config_frame("A", "10.0.0.1", &[("temp", "range")], &[]));
    admin.process_incoming_json(&config_frame("B", "10.0.0.2", &[], &[("temp", "range")]));

    let result = admin.add_route_endpoints(
        &RouteEndpoint::new("A", "temp", "10.0.0.1"),
        &RouteEndpoint::new("B", "temp", "10.0.0.2"),
    );
    assert!(matches!(result, Err(SpacebrewError::NotConnected)));
    assert!(admin.connection().transport().writes.is_empty());
}

#[test]
fn test_remove_route_requires_active_route() {
    let mut admin = admin_with_clients();
    let result = admin.remove_route("A", "10.0.0.1", "temp", "B", "10.0.0.2", "temp");
    assert!(matches!(result, Err(SpacebrewError::InvalidRoute(RouteSide::Both))));
    assert!(admin.remove_route_for(&temp_route()).is_err());
    assert!(admin.connection().transport().writes.is_empty());

    admin.process_incoming_json(&route_frame("add", "A", "B"));
    let result = admin.remove_route_endpoints(
        &RouteEndpoint::new("A", "temp", "10.0.0.1"),
        &RouteEndpoint::new("B", "other", "10.0.0.2"),
    );
    assert!(matches!(
        result,
        Err(SpacebrewError::InvalidRoute(RouteSide::Subscriber))
    ));

    admin.remove_route_for(&temp_route()).unwrap();
    let writes = admin.connection_mut().transport_mut().take_writes();
    let frame: Value = serde_json::from_str(&writes[0]).unwrap();
    assert_eq!(frame["route"]["type"], json!("remove"));
    assert_eq!(frame["route"]["subscriber"]["clientName"], json!("B"));
    assert_eq!(admin.current_routes().len(), 1);
}

#[test]
fn test_end_to_end_route_between_two_apps() {
    let mut app_a = Config::with_address("A", "sensor", "10.0.0.1");
    app_a.add_publish("temp", "range", "0");
    let mut app_b = Config::with_address("B", "display", "10.0.0.2");
    app_b.add_subscribe("temp", "range");

    let mut admin = connected_admin();
    let announce = |config: &Config| {
        let mut frame: Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        frame["config"]["remoteAddress"] = json!(config.remote_address);
        frame.to_string()
    };
    admin
        .connection_mut()
        .transport_mut()
        .push(TransportEvent::Read(announce(&app_a)));
    admin
        .connection_mut()
        .transport_mut()
        .push(TransportEvent::Read(announce(&app_b)));
    let events = admin.poll_at(10);
    assert_eq!(events.len(), 2);

    admin
        .add_route("A", "10.0.0.1", "temp", "B", "10.0.0.2", "temp")
        .unwrap();
    let writes = admin.connection_mut().transport_mut().take_writes();
    assert_eq!(writes.len(), 1);
    let request: Value = serde_json::from_str(&writes[0]).unwrap();
    assert_eq!(request["route"]["type"], json!("add"));
    assert_eq!(request["route"]["publisher"]["type"], json!("range"));
    assert!(admin.current_routes().is_empty());

    // the router echoes the route back as confirmation
    admin
        .connection_mut()
        .transport_mut()
        .push(TransportEvent::Read(writes[0].clone()));
    let events = admin.poll_at(20);

    assert_eq!(events, vec![AdminEvent::RouteAdded(temp_route())]);
    assert_eq!(admin.current_routes(), &[temp_route()]);
}
