//! 指令/查询插件集成测试
//!
//! 通过 SDK 入口驱动脚本化守护进程，覆盖：
//! - 每个失败结果码到错误变体的映射
//! - 成功/失败调用各自恰好一个终结事件
//! - 指令派发顺序与设置参数透传
//! - 查询成功交付标量、失败丢弃载荷
//! - 传输层失败与守护进程拒绝的区分
//!
//! **注意：** 这些测试只依赖脚本化 mock，不需要真实守护进程。

use std::sync::Arc;
use std::time::Duration;

use kestrel_rpc::{MockDaemon, TransportError};
use kestrel_sdk::proto::{Ack, AltitudeReply, ResultCode};
use kestrel_sdk::prelude::*;

fn connect(daemon: &Arc<MockDaemon>) -> Drone {
    Drone::connect(daemon.clone())
}

/// 失败结果码与期望错误变体的对照
fn maps_to_expected_variant(code: ResultCode, err: &VehicleError) -> bool {
    match code {
        ResultCode::Success => false,
        ResultCode::Unknown => matches!(err, VehicleError::Unknown { .. }),
        ResultCode::NoSystem => matches!(err, VehicleError::NoSystem),
        ResultCode::ConnectionError => matches!(err, VehicleError::ConnectionError),
        ResultCode::Busy => matches!(err, VehicleError::Busy),
        ResultCode::CommandDenied => matches!(err, VehicleError::CommandDenied { .. }),
        ResultCode::CommandDeniedLandedStateUnknown => {
            matches!(err, VehicleError::CommandDeniedLandedStateUnknown)
        }
        ResultCode::CommandDeniedNotLanded => {
            matches!(err, VehicleError::CommandDeniedNotLanded)
        }
        ResultCode::Timeout => matches!(err, VehicleError::Timeout),
        ResultCode::VtolTransitionSupportUnknown => {
            matches!(err, VehicleError::VtolTransitionSupportUnknown)
        }
        ResultCode::NoVtolTransitionSupport => {
            matches!(err, VehicleError::VtolTransitionUnsupported)
        }
    }
}

#[test]
fn test_arm_success_completes_once() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_ok();
    let drone = connect(&daemon);

    let pending = drone.action().arm();
    assert!(pending.wait_timeout(Duration::from_secs(1)).is_ok());
    // 成功交付后不再有第二个事件
    assert!(pending.try_wait().is_none());
    assert_eq!(daemon.action.calls(), vec!["arm"]);
}

#[test]
fn test_arm_busy_fails_once() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_fail(ResultCode::Busy);
    let drone = connect(&daemon);

    let pending = drone.action().arm();
    let err = pending
        .wait_timeout(Duration::from_secs(1))
        .expect_err("busy daemon must fail the call");
    assert!(matches!(err, VehicleError::Busy));
    assert!(err.is_retryable());
    // 失败同样只有一个终结事件
    assert!(pending.try_wait().is_none());
}

#[test]
fn test_every_failure_code_maps_to_failure() {
    let failure_codes = [
        ResultCode::Unknown,
        ResultCode::NoSystem,
        ResultCode::ConnectionError,
        ResultCode::Busy,
        ResultCode::CommandDenied,
        ResultCode::CommandDeniedLandedStateUnknown,
        ResultCode::CommandDeniedNotLanded,
        ResultCode::Timeout,
        ResultCode::VtolTransitionSupportUnknown,
        ResultCode::NoVtolTransitionSupport,
    ];
    let daemon = Arc::new(MockDaemon::new());
    let drone = connect(&daemon);

    for code in failure_codes {
        daemon.action.push_fail(code);
        let err = drone
            .action()
            .arm()
            .wait()
            .expect_err("non-success code must fail");
        assert!(
            maps_to_expected_variant(code, &err),
            "code {code:?} mapped to unexpected error {err:?}"
        );
    }

    // 成功码永远不映射为错误
    daemon.action.push_ok();
    assert!(drone.action().arm().wait().is_ok());
}

#[test]
fn test_command_denied_reason_is_forwarded() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_fail_with_message(ResultCode::CommandDenied, "low battery");
    let drone = connect(&daemon);

    match drone.action().takeoff().wait() {
        Err(VehicleError::CommandDenied { reason }) => assert_eq!(reason, "low battery"),
        other => panic!("expected CommandDenied, got {other:?}"),
    }
}

#[test]
fn test_all_commands_reach_their_operations() {
    let daemon = Arc::new(MockDaemon::new());
    for _ in 0..11 {
        daemon.action.push_ok();
    }
    let drone = connect(&daemon);
    let action = drone.action();

    action.arm().wait().unwrap();
    action.disarm().wait().unwrap();
    action.takeoff().wait().unwrap();
    action.land().wait().unwrap();
    action.kill().wait().unwrap();
    action.return_to_launch().wait().unwrap();
    action.transition_to_fixed_wing().wait().unwrap();
    action.transition_to_multicopter().wait().unwrap();
    action.set_takeoff_altitude(123.5).wait().unwrap();
    action.set_maximum_speed(321.5).wait().unwrap();
    action.set_return_to_launch_altitude(80.0).wait().unwrap();

    assert_eq!(
        daemon.action.calls(),
        vec![
            "arm",
            "disarm",
            "takeoff",
            "land",
            "kill",
            "return_to_launch",
            "transition_to_fixed_wing",
            "transition_to_multicopter",
            "set_takeoff_altitude",
            "set_maximum_speed",
            "set_return_to_launch_altitude",
        ]
    );
    // 设置类指令的参数原样透传
    assert_eq!(
        daemon.action.set_calls(),
        vec![
            ("set_takeoff_altitude", 123.5),
            ("set_maximum_speed", 321.5),
            ("set_return_to_launch_altitude", 80.0),
        ]
    );
}

#[test]
fn test_get_takeoff_altitude_returns_scalar() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_altitude(Ok(AltitudeReply::ok(123.5)));
    let drone = connect(&daemon);

    let altitude = drone.action().get_takeoff_altitude().wait().unwrap();
    assert_eq!(altitude, 123.5);
    assert_eq!(daemon.action.calls(), vec!["get_takeoff_altitude"]);
}

#[test]
fn test_remaining_queries_return_scalars() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_speed(Ok(kestrel_sdk::proto::SpeedReply::ok(321.5)));
    daemon.action.push_altitude(Ok(AltitudeReply::ok(80.0)));
    let drone = connect(&daemon);

    assert_eq!(drone.action().get_maximum_speed().wait().unwrap(), 321.5);
    assert_eq!(
        drone.action().get_return_to_launch_altitude().wait().unwrap(),
        80.0
    );
}

#[test]
fn test_query_failure_discards_payload() {
    let daemon = Arc::new(MockDaemon::new());
    // 守护进程拒绝时载荷字段无意义，绝不能交付 99.0
    daemon.action.push_altitude(Ok(AltitudeReply {
        ack: Ack::fail(ResultCode::NoSystem, ""),
        altitude_m: 99.0,
    }));
    let drone = connect(&daemon);

    let err = drone
        .action()
        .get_takeoff_altitude()
        .wait()
        .expect_err("failed ack must discard the payload");
    assert!(matches!(err, VehicleError::NoSystem));
}

#[test]
fn test_transport_failure_is_distinct_from_denial() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_ack(Err(TransportError::ConnectionClosed));
    let drone = connect(&daemon);

    let err = drone.action().disarm().wait().expect_err("closed transport");
    assert!(err.is_transport());
    assert!(!err.is_denied());
}

#[test]
fn test_exactly_one_terminal_event_per_call() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_fail(ResultCode::Timeout);
    let drone = connect(&daemon);

    let pending = drone.action().arm();
    let first = pending.wait_timeout(Duration::from_secs(1));
    assert!(matches!(first, Err(VehicleError::Timeout)));

    // 再次等待拿不到第二个终结事件，只会看到通道已关闭
    let second = pending.wait_timeout(Duration::from_millis(20));
    assert!(matches!(second, Err(VehicleError::ChannelClosed)));
}

#[test]
fn test_unscripted_call_surfaces_rejection() {
    let daemon = Arc::new(MockDaemon::new());
    let drone = connect(&daemon);

    let err = drone.action().kill().wait().expect_err("nothing scripted");
    assert!(matches!(
        err,
        VehicleError::Transport(TransportError::Rejected(_))
    ));
}

#[test]
fn test_dropping_pending_does_not_poison_later_calls() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_ok();
    daemon.action.push_ok();
    let drone = connect(&daemon);

    // 调用方对首个结果不感兴趣，直接丢弃句柄
    let _ = drone.action().arm();

    assert!(drone.action().disarm().wait().is_ok());
}

#[test]
fn test_plugins_are_cloneable_and_share_connection() {
    let daemon = Arc::new(MockDaemon::new());
    daemon.action.push_ok();
    daemon.action.push_ok();
    let drone = connect(&daemon);

    let first = drone.action().clone();
    let second = drone.action().clone();
    assert!(first.arm().wait().is_ok());
    assert!(second.disarm().wait().is_ok());
    assert_eq!(daemon.action.calls(), vec!["arm", "disarm"]);
}
