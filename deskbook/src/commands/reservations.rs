use desk_client::DeskDirectory;
use shared::date_to_str;
use tracing::info;

pub async fn run(directory: &DeskDirectory) -> anyhow::Result<()> {
    let me = directory.myself().await?;
    let reservations = me.reservations.get(false).await?;

    if reservations.is_empty() {
        info!("{} has no reserved desk", me.name);
        return Ok(());
    }
    for reservation in &reservations {
        info!(
            "{}  {}  desk {}",
            date_to_str(reservation.day),
            reservation.zone.name,
            reservation.desk.name
        );
    }
    Ok(())
}
