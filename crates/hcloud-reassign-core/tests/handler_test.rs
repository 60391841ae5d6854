mod common;

use common::{
    FakeCloud, RecordingSleeper, floating_ip_section, primary_ip_section, route_section,
};
use hcloud_reassign_cloud::{ActionStatus, Route, Server, ServerStatus};
use hcloud_reassign_core::handler::{FloatingIpHandler, PrimaryIpHandler, RouteHandler};
use hcloud_reassign_core::{
    ActionPoller, Direction, HandlerContext, HandlerRegistry, PollConfig, Reassign, ReassignError,
    ResourceSection, ResourceType, StatusCode, ValidationError,
};

const SRV_A: u64 = 1;
const SRV_B: u64 = 2;
const NETWORK: u64 = 30;

fn two_servers() -> FakeCloud {
    FakeCloud::new()
        .with_server(Server::new(SRV_A, "srv-a").with_private_ip(NETWORK, "10.0.0.2"))
        .with_server(Server::new(SRV_B, "srv-b").with_private_ip(NETWORK, "10.0.0.3"))
}

fn context<'a>(cloud: &'a FakeCloud, sleeper: &'a RecordingSleeper) -> HandlerContext<'a> {
    HandlerContext::new(
        cloud,
        ActionPoller::new(cloud, sleeper, PollConfig::default()),
    )
}

#[tokio::test]
async fn test_invalid_direction_for_every_type() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let registry = HandlerRegistry::builtin();

    let sections = [
        floating_ip_section("web-ip", "srv-a", "srv-b"),
        primary_ip_section("web-v4", "srv-a", "srv-b"),
        route_section("internal", "10.100.1.0/24", "srv-a", "srv-b"),
    ];

    for section in &sections {
        let handler = registry.build(section, context(&cloud, &sleeper)).unwrap();
        let result = handler.reassign_str("sideways").await;
        assert!(
            matches!(&result, Err(ReassignError::InvalidDirection(d)) if d == "sideways"),
            "{:?}: {:?}",
            handler.resource_type(),
            result
        );
    }
    assert!(cloud.calls().is_empty());
}

#[tokio::test]
async fn test_registry_resolves_types() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let registry = HandlerRegistry::builtin();

    let handler = registry
        .build(
            &route_section("internal", "10.100.1.0/24", "srv-a", "srv-b"),
            context(&cloud, &sleeper),
        )
        .unwrap();
    assert_eq!(handler.resource_type(), ResourceType::Route);
    assert_eq!(handler.name(), "internal");
}

#[tokio::test]
async fn test_registry_missing_type() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let section = ResourceSection::new().with("resource", "web-ip");

    let result = HandlerRegistry::builtin().build(&section, context(&cloud, &sleeper));
    assert!(matches!(
        result,
        Err(ReassignError::Validation(ValidationError::MissingType))
    ));
}

#[tokio::test]
async fn test_registry_unknown_type() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let section = floating_ip_section("web-ip", "srv-a", "srv-b").with("type", "load_balancer");

    let result = HandlerRegistry::builtin().build(&section, context(&cloud, &sleeper));
    assert!(matches!(result, Err(ReassignError::UnknownType(t)) if t == "load_balancer"));
}

#[tokio::test]
async fn test_empty_registry_reports_unknown_type() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let section = floating_ip_section("web-ip", "srv-a", "srv-b");

    let result = HandlerRegistry::empty().build(&section, context(&cloud, &sleeper));
    assert!(matches!(result, Err(ReassignError::UnknownType(_))));
}

#[test]
fn test_handler_type_mismatch() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let result = FloatingIpHandler::new(&section, context(&cloud, &sleeper));
    assert!(matches!(
        result,
        Err(ValidationError::TypeMismatch { configured, expected })
            if configured == "ip_public" && expected == "ip_floating"
    ));
}

#[test]
fn test_route_handler_requires_route_option() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let mut section = route_section("internal", "10.100.1.0/24", "srv-a", "srv-b");
    section.remove("route");

    let result = RouteHandler::new(&section, context(&cloud, &sleeper));
    assert!(matches!(result, Err(ValidationError::MissingOption(o)) if o == "route"));
}

#[tokio::test]
async fn test_floating_ip_to_destination() {
    let cloud = two_servers().with_floating_ip(10, "web-ip", Some(SRV_A));
    let sleeper = RecordingSleeper::new();
    let section = floating_ip_section("web-ip", "srv-a", "srv-b");

    let handler = FloatingIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert_eq!(cloud.calls(), vec!["assign_floating_ip:10:2"]);
    assert_eq!(cloud.action_fetches(), 1);
    assert_eq!(cloud.floating_ip_server("web-ip"), Some(SRV_B));
}

#[tokio::test]
async fn test_floating_ip_missing_resource() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let section = floating_ip_section("web-ip", "srv-a", "srv-b");

    let handler = FloatingIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Error);
    assert!(cloud.calls().is_empty());
    assert_eq!(cloud.action_fetches(), 0);
}

#[tokio::test]
async fn test_floating_ip_missing_target_server() {
    let cloud = two_servers().with_floating_ip(10, "web-ip", Some(SRV_A));
    let sleeper = RecordingSleeper::new();
    let section = floating_ip_section("web-ip", "srv-a", "srv-z");

    let handler = FloatingIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Error);
    assert_eq!(cloud.action_fetches(), 0);
    assert_eq!(cloud.floating_ip_server("web-ip"), Some(SRV_A));
}

#[tokio::test]
async fn test_primary_ip_full_sequence() {
    let cloud = two_servers().with_primary_ip(20, "web-v4", Some(SRV_A));
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let handler = PrimaryIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert_eq!(
        cloud.calls(),
        vec![
            "poweroff:1",
            "unassign_primary_ip:20",
            "poweroff:2",
            "assign_primary_ip:20:2",
            "poweron:2",
            "poweron:1",
        ]
    );
    assert_eq!(cloud.action_fetches(), 6);
    assert_eq!(cloud.primary_ip_assignee("web-v4"), Some(SRV_B));
    assert_eq!(cloud.server_status("srv-a"), Some(ServerStatus::Running));
    assert_eq!(cloud.server_status("srv-b"), Some(ServerStatus::Running));
}

#[tokio::test]
async fn test_primary_ip_stopped_holder_stays_off() {
    let cloud = FakeCloud::new()
        .with_server(Server::new(SRV_A, "srv-a").with_status(ServerStatus::Off))
        .with_server(Server::new(SRV_B, "srv-b"))
        .with_primary_ip(20, "web-v4", Some(SRV_A));
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let handler = PrimaryIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert_eq!(
        cloud.calls(),
        vec![
            "unassign_primary_ip:20",
            "poweroff:2",
            "assign_primary_ip:20:2",
            "poweron:2",
        ]
    );
    assert_eq!(cloud.server_status("srv-a"), Some(ServerStatus::Off));
}

#[tokio::test]
async fn test_primary_ip_unassigned() {
    let cloud = two_servers().with_primary_ip(20, "web-v4", None);
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let handler = PrimaryIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToSource).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert_eq!(
        cloud.calls(),
        vec!["poweroff:1", "assign_primary_ip:20:1", "poweron:1"]
    );
}

#[tokio::test]
async fn test_primary_ip_already_on_target() {
    let cloud = two_servers().with_primary_ip(20, "web-v4", Some(SRV_B));
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let handler = PrimaryIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert!(cloud.calls().is_empty());
}

#[tokio::test]
async fn test_primary_ip_aborts_on_failed_step() {
    let cloud = two_servers().with_primary_ip(20, "web-v4", Some(SRV_A));
    cloud.script_next_action(&[ActionStatus::Error]);
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let handler = PrimaryIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Error);
    assert_eq!(cloud.calls(), vec!["poweroff:1"]);
    assert_eq!(cloud.primary_ip_assignee("web-v4"), Some(SRV_A));
}

#[tokio::test]
async fn test_primary_ip_failed_assign_restarts_servers() {
    let cloud = two_servers().with_primary_ip(20, "web-v4", Some(SRV_A));
    cloud.script_next_action(&[ActionStatus::Success]);
    cloud.script_next_action(&[ActionStatus::Success]);
    cloud.script_next_action(&[ActionStatus::Success]);
    cloud.script_next_action(&[ActionStatus::Error]);
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let handler = PrimaryIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Error);
    assert_eq!(
        cloud.calls(),
        vec![
            "poweroff:1",
            "unassign_primary_ip:20",
            "poweroff:2",
            "assign_primary_ip:20:2",
            "poweron:1",
            "poweron:2",
        ]
    );
    assert_eq!(cloud.server_status("srv-a"), Some(ServerStatus::Running));
    assert_eq!(cloud.server_status("srv-b"), Some(ServerStatus::Running));
}

#[tokio::test]
async fn test_primary_ip_failed_unassign_restarts_holder() {
    let cloud = two_servers().with_primary_ip(20, "web-v4", Some(SRV_A));
    cloud.script_next_action(&[ActionStatus::Success]);
    cloud.script_next_action(&[ActionStatus::Error]);
    let sleeper = RecordingSleeper::new();
    let section = primary_ip_section("web-v4", "srv-a", "srv-b");

    let handler = PrimaryIpHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Error);
    assert_eq!(
        cloud.calls(),
        vec!["poweroff:1", "unassign_primary_ip:20", "poweron:1"]
    );
    assert_eq!(cloud.server_status("srv-a"), Some(ServerStatus::Running));
}

#[tokio::test]
async fn test_route_recreated_with_new_gateway() {
    let cloud = two_servers().with_network(
        NETWORK,
        "internal",
        vec![Route::new("10.100.1.0/24", "10.0.0.2")],
    );
    let sleeper = RecordingSleeper::new();
    let section = route_section("internal", "10.100.1.0/24", "srv-a", "srv-b");

    let handler = RouteHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert_eq!(
        cloud.calls(),
        vec![
            "delete_route:30:10.100.1.0/24:10.0.0.2",
            "add_route:30:10.100.1.0/24:10.0.0.3",
        ]
    );
    assert_eq!(
        cloud.routes("internal"),
        vec![Route::new("10.100.1.0/24", "10.0.0.3")]
    );
}

#[tokio::test]
async fn test_route_added_when_absent() {
    let cloud = two_servers().with_network(NETWORK, "internal", vec![]);
    let sleeper = RecordingSleeper::new();
    let section = route_section("internal", "10.100.1.0/24", "srv-a", "srv-b");

    let handler = RouteHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToSource).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert_eq!(cloud.calls(), vec!["add_route:30:10.100.1.0/24:10.0.0.2"]);
}

#[tokio::test]
async fn test_route_already_points_at_target() {
    let cloud = two_servers().with_network(
        NETWORK,
        "internal",
        vec![Route::new("10.100.1.0/24", "10.0.0.3")],
    );
    let sleeper = RecordingSleeper::new();
    let section = route_section("internal", "10.100.1.0/24", "srv-a", "srv-b");

    let handler = RouteHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Success);
    assert!(cloud.calls().is_empty());
}

#[tokio::test]
async fn test_route_target_outside_network() {
    let cloud = FakeCloud::new()
        .with_server(Server::new(SRV_A, "srv-a").with_private_ip(NETWORK, "10.0.0.2"))
        .with_server(Server::new(SRV_B, "srv-b"))
        .with_network(
            NETWORK,
            "internal",
            vec![Route::new("10.100.1.0/24", "10.0.0.2")],
        );
    let sleeper = RecordingSleeper::new();
    let section = route_section("internal", "10.100.1.0/24", "srv-a", "srv-b");

    let handler = RouteHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Error);
    assert!(cloud.calls().is_empty());
    assert_eq!(cloud.action_fetches(), 0);
}

#[tokio::test]
async fn test_route_missing_network() {
    let cloud = two_servers();
    let sleeper = RecordingSleeper::new();
    let section = route_section("internal", "10.100.1.0/24", "srv-a", "srv-b");

    let handler = RouteHandler::new(&section, context(&cloud, &sleeper)).unwrap();
    let status = handler.reassign(Direction::ToDestination).await.unwrap();

    assert_eq!(status, StatusCode::Error);
    assert_eq!(cloud.action_fetches(), 0);
}
