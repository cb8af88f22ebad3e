//! 遥测订阅演示
//!
//! 演示三种订阅用法：迭代到自然完成、中途取消订阅、以及冷流
//! 语义下的重复订阅。
//!
//! # 使用说明
//!
//! ```bash
//! RUST_LOG=kestrel_client=debug cargo run -p kestrel-sdk --example telemetry_watch
//! ```

use std::sync::Arc;
use std::time::Instant;

use kestrel_rpc::{MockDaemon, StreamScript};
use kestrel_sdk::proto::telemetry as wire;
use kestrel_sdk::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let daemon = Arc::new(MockDaemon::new());
    let drone = DroneBuilder::new()
        .thread_prefix("watch")
        .feed_poll_timeout_ms(10)
        .connect(daemon.clone());

    // ==================== 1. 迭代到自然完成 ====================
    println!("🔋 电池流：迭代到自然完成");
    daemon.telemetry.script_battery(StreamScript::complete(vec![
        wire::Battery {
            voltage_v: 12.6,
            remaining_percent: 1.0,
        },
        wire::Battery {
            voltage_v: 12.1,
            remaining_percent: 0.86,
        },
        wire::Battery {
            voltage_v: 11.7,
            remaining_percent: 0.71,
        },
    ]));

    for event in drone.telemetry().battery() {
        let battery = event?;
        println!(
            "   {:.1} V，剩余 {:.0}%",
            battery.voltage_v,
            battery.remaining_percent * 100.0
        );
    }
    println!();

    // ==================== 2. 中途取消订阅 ====================
    println!("📍 位置流：取两个采样点后取消");
    let probe = daemon.telemetry.script_position(StreamScript::stay_open(vec![
        wire::Position {
            latitude_deg: 41.848695,
            longitude_deg: 75.132751,
            absolute_altitude_m: 3002.1,
            relative_altitude_m: 50.3,
        },
        wire::Position {
            latitude_deg: 46.522626,
            longitude_deg: 6.635356,
            absolute_altitude_m: 542.2,
            relative_altitude_m: 79.8,
        },
    ]));

    let mut positions = drone.telemetry().position();
    for _ in 0..2 {
        if let Some(event) = positions.next() {
            let position = event?;
            println!("   lat={:.6} lon={:.6}", position.latitude_deg, position.longitude_deg);
        }
    }

    let started = Instant::now();
    positions.unsubscribe();
    println!(
        "   取消耗时 {:?}，底层流已释放: {}",
        started.elapsed(),
        probe.is_cancelled()
    );
    println!();

    // ==================== 3. 冷流：重复订阅各自独立 ====================
    println!("✈️  飞行模式流：两次订阅各自发起新调用");
    daemon
        .telemetry
        .script_flight_mode(StreamScript::complete(vec![wire::FlightMode::Takeoff]));
    daemon
        .telemetry
        .script_flight_mode(StreamScript::complete(vec![wire::FlightMode::Hold]));

    for round in 1..=2 {
        for event in drone.telemetry().flight_mode() {
            println!("   第 {round} 次订阅: {:?}", event?);
        }
    }
    println!(
        "   守护进程共收到 {} 次 flight_mode 订阅",
        daemon.telemetry.subscribe_count("flight_mode")
    );

    Ok(())
}
