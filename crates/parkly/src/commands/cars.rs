//! Car handlers.

use parkly_core::{NewCar, Parkly, Vehicle};

use crate::cli::{CarsArgs, CarsCommand, GlobalOpts};
use crate::commands::util;
use crate::error::CliError;
use crate::output::{self, VehicleRow};

pub async fn handle(
    client: &Parkly,
    args: CarsArgs,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        CarsCommand::List => {
            let data = util::envelope(client.get_user_data(None).await)?;
            let out = output::render_list(&global.output, &data.cars, |v| VehicleRow::from(v), |v| {
                v.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CarsCommand::Create {
            brand,
            model,
            year,
            plate,
        } => {
            util::require_session(client, profile)?;
            let car = NewCar {
                brand,
                model,
                year,
                license_plate: plate,
            };
            let vehicle = util::envelope(client.create_car(&car).await)?;
            let out = output::render_single(&global.output, &vehicle, vehicle_detail, |v| {
                v.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CarsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete car {id}?"), global.yes)? {
                return Ok(());
            }
            util::envelope(client.delete_car(&id).await)?;
            output::print_status(
                &output::success(&format!("Deleted car {id}"), color),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn vehicle_detail(v: &Vehicle) -> String {
    let text = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".into());
    [
        format!("ID:       {}", v.id),
        format!("Brand:    {}", text(&v.brand)),
        format!("Model:    {}", text(&v.model)),
        format!(
            "Year:     {}",
            v.year.map_or_else(|| "-".into(), |y| y.to_string())
        ),
        format!("Plate:    {}", text(&v.license_plate)),
        format!("Parked:   {}", if v.is_parking { "yes" } else { "no" }),
        format!("Logo:     {}", v.logo),
    ]
    .join("\n")
}
