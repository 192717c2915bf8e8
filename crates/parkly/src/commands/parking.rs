//! Parking handlers.

use parkly_core::{ParkingSession, Parkly};

use crate::cli::{GlobalOpts, ParkingArgs, ParkingCommand};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &Parkly,
    args: ParkingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ParkingCommand::Start { car_id, spot_id } => {
            let session = util::envelope(client.start_parking(&car_id, &spot_id).await)?;
            let out = output::render_single(
                &global.output,
                &session,
                |s| {
                    output::success(
                        &format!(
                            "Parking started for car {car_id} on spot {spot_id}{}",
                            since(s)
                        ),
                        color,
                    )
                },
                |s| s.id.map(|id| id.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ParkingCommand::Stop { car_id } => {
            util::envelope(client.stop_parking(&car_id).await)?;
            output::print_status(
                &output::success(&format!("Parking stopped for car {car_id}"), color),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn since(session: &ParkingSession) -> String {
    session
        .start_time
        .as_deref()
        .map(|t| format!(" at {t}"))
        .unwrap_or_default()
}
