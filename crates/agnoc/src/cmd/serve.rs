use agnoc_protocol::Id;
use agnoc_robot::domain::{Device, User};
use agnoc_robot::{DeviceHandle, Robot, RobotConfig, RobotEvent, SessionRouter};
use agnoc_session::{SessionConfig, SessionListener};
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cmd::{parse_duration, ServeArgs};
use crate::exit::{io_error, session_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_record, OutputFormat, TelemetryRecord};

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    let session = SessionConfig {
        idle_timeout: parse_duration(&args.idle_timeout)?,
        ..SessionConfig::default()
    };
    let robot = RobotConfig {
        response_timeout: Some(parse_duration(&args.response_timeout)?),
        mode_change_timeout: parse_duration(&args.mode_timeout)?,
        ..RobotConfig::default()
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("runtime setup failed", err))?;

    runtime.block_on(serve(args, session, robot, format))
}

async fn serve(
    args: ServeArgs,
    session: SessionConfig,
    robot: RobotConfig,
    format: OutputFormat,
) -> CliResult<i32> {
    let listener = SessionListener::bind(args.addr.as_str())
        .await
        .map_err(|err| session_error("bind failed", err))?
        .with_config(session);
    let local = listener
        .local_addr()
        .map_err(|err| session_error("bind failed", err))?;

    print_record(
        &TelemetryRecord::new("listening", None, json!({ "addr": local.to_string() })),
        format,
    );

    let cancel = CancellationToken::new();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let accept = tokio::spawn({
        let cancel = cancel.clone();
        async move { listener.serve(events_tx, cancel).await }
    });

    let router = SessionRouter::new(User::new(Id::new(args.user_id)))
        .with_model(args.model)
        .with_config(robot);
    let routing = tokio::spawn(router.run(events_rx, cancel.clone(), move |robot| {
        watch(robot, format)
    }));

    tokio::signal::ctrl_c()
        .await
        .map_err(|err| io_error("signal handler setup failed", err))?;
    info!("shutting down");
    cancel.cancel();

    let router = routing
        .await
        .map_err(|err| CliError::new(INTERNAL, format!("router task failed: {err}")))?;
    match accept.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(error = %err, "listener stopped with error"),
        Err(err) => warn!(error = %err, "listener task failed"),
    }

    print_record(
        &TelemetryRecord::new("stopped", None, json!({ "devices": router.len() })),
        format,
    );
    Ok(SUCCESS)
}

/// Print a record for the new device, then one per change it reports.
///
/// The printer holds only the device handle, so it ends once the router
/// drops the robot and its event sender.
fn watch(robot: &Robot, format: OutputFormat) {
    let device = robot.device().clone();
    let id = device.id().value();
    let model = device.read(|device| device.system().model);
    print_record(
        &TelemetryRecord::new("device_connected", Some(id), json!({ "model": model.as_str() })),
        format,
    );

    let mut events = robot.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let (name, detail) = describe(&device, event);
                    print_record(&TelemetryRecord::new(name, Some(id), detail), format);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(device_id = id, skipped, "telemetry printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

fn describe(device: &DeviceHandle, event: RobotEvent) -> (&'static str, Value) {
    device.read(|device| match event {
        RobotEvent::DeviceUpdated => ("device_updated", device_detail(device)),
        RobotEvent::MapUpdated => ("map_updated", map_detail(device)),
    })
}

fn device_detail(device: &Device) -> Value {
    json!({
        "system": device.system(),
        "status": device.status(),
        "config": device.config(),
    })
}

fn map_detail(device: &Device) -> Value {
    match device.map() {
        Some(map) => json!({
            "map_id": map.id,
            "rooms": map.rooms.len(),
            "restricted_zones": map.restricted_zones.len(),
            "robot": map.robot,
            "charger": map.charger,
        }),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use agnoc_robot::domain::{DeviceModel, DeviceStatus};

    use super::*;

    #[test]
    fn device_update_carries_status() {
        let device = DeviceHandle::new(Device::new(Id::new(7), DeviceModel::C3490));
        let (name, detail) = describe(&device, RobotEvent::DeviceUpdated);
        assert_eq!(name, "device_updated");
        assert_eq!(detail["status"], Value::Null);
        assert_eq!(detail["system"]["model"], "C3490");

        device.update(|device| device.update_status(DeviceStatus::default()));
        let (_, detail) = describe(&device, RobotEvent::DeviceUpdated);
        assert!(detail["status"].is_object());
    }

    #[test]
    fn map_update_without_map_is_null() {
        let device = DeviceHandle::new(Device::new(Id::new(7), DeviceModel::Unknown));
        assert_eq!(
            describe(&device, RobotEvent::MapUpdated),
            ("map_updated", Value::Null)
        );
    }
}
