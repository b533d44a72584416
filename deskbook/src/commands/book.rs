use chrono::NaiveDate;
use desk_client::DeskDirectory;
use tracing::info;

pub async fn run(
    directory: &DeskDirectory,
    zone: &str,
    desk: &str,
    weekdays: &[String],
    today: NaiveDate,
) -> anyhow::Result<()> {
    let report = desk_client::book(directory.zones(), zone, desk, weekdays, today).await?;

    info!(
        zone = %report.zone,
        desk = %report.desk,
        "Booked {} of {} matching day(s)",
        report.booked().count(),
        report.days.len()
    );
    Ok(())
}
