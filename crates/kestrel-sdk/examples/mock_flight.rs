//! 脚本化起降演示
//!
//! 用脚本化守护进程走一遍完整的飞行流程：解锁、设置起飞高度、
//! 起飞、监视遥测、降落、上锁。不需要真实飞行器即可观察 SDK 的
//! 事件契约。
//!
//! # 使用说明
//!
//! ```bash
//! RUST_LOG=debug cargo run -p kestrel-sdk --example mock_flight
//! ```

use std::sync::Arc;

use kestrel_rpc::{MockDaemon, StreamScript};
use kestrel_sdk::proto::telemetry as wire;
use kestrel_sdk::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kestrel_client=debug".parse()?),
        )
        .init();

    println!("════════════════════════════════════════");
    println!("       Kestrel SDK 脚本化起降演示");
    println!("════════════════════════════════════════");
    println!();

    // ==================== 准备: 编写守护进程脚本 ====================
    let daemon = Arc::new(MockDaemon::new());

    // 指令应答按调用顺序出队：解锁、设高度、起飞、降落、上锁
    daemon.action.push_ok();
    daemon.action.push_ok();
    daemon.action.push_ok();
    daemon.action.push_ok();
    daemon.action.push_ok();
    daemon.action.push_altitude(Ok(kestrel_sdk::proto::AltitudeReply::ok(30.0)));

    // 起飞过程中的位置流：爬升三个采样点后正常完成
    daemon.telemetry.script_position(StreamScript::complete(vec![
        wire::Position {
            latitude_deg: 47.397742,
            longitude_deg: 8.545594,
            absolute_altitude_m: 488.0,
            relative_altitude_m: 0.0,
        },
        wire::Position {
            latitude_deg: 47.397742,
            longitude_deg: 8.545594,
            absolute_altitude_m: 503.1,
            relative_altitude_m: 15.1,
        },
        wire::Position {
            latitude_deg: 47.397743,
            longitude_deg: 8.545596,
            absolute_altitude_m: 518.0,
            relative_altitude_m: 30.0,
        },
    ]));
    daemon
        .telemetry
        .script_in_air(StreamScript::complete(vec![false, true, true, false]));

    // ==================== 步骤 1: 连接 ====================
    println!("⏳ 步骤 1: 连接守护进程...");
    let drone = DroneBuilder::new()
        .thread_prefix("mock-flight")
        .feed_poll_timeout_ms(10)
        .connect(daemon.clone());
    println!("   ✅ 已连接\n");

    // ==================== 步骤 2: 解锁并设置起飞高度 ====================
    println!("🔓 步骤 2: 解锁并设置起飞高度...");
    drone.action().arm().wait()?;
    drone.action().set_takeoff_altitude(30.0).wait()?;
    let altitude = drone.action().get_takeoff_altitude().wait()?;
    println!("   ✅ 已解锁，起飞高度 {altitude} m\n");

    // ==================== 步骤 3: 起飞并监视位置 ====================
    println!("🛫 步骤 3: 起飞...");
    drone.action().takeoff().wait()?;

    for event in drone.telemetry().position() {
        let position = event?;
        println!(
            "   📍 lat={:.6} lon={:.6} rel_alt={:.1} m",
            position.latitude_deg, position.longitude_deg, position.relative_altitude_m
        );
    }
    println!("   ✅ 位置流正常完成\n");

    // ==================== 步骤 4: 降落并上锁 ====================
    println!("🛬 步骤 4: 降落并上锁...");
    drone.action().land().wait()?;
    drone.action().disarm().wait()?;

    let states: Vec<bool> = drone
        .telemetry()
        .in_air()
        .collect::<kestrel_sdk::Result<Vec<_>>>()?;
    println!("   📊 在空状态序列: {states:?}");
    println!("   ✅ 演示完成！");
    println!();
    println!("💡 关键要点：");
    println!("   1. 每个指令恰好一个终结事件，wait() 拿到成败");
    println!("   2. 订阅是冷流：每次调用发起一次全新的遥测请求");
    println!("   3. 流正常完成时迭代器自然结束，无需手动收尾");

    Ok(())
}
