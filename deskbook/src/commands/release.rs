use chrono::NaiveDate;
use desk_client::DeskApi;
use shared::date_to_str;
use tracing::info;

pub async fn run(api: &dyn DeskApi, day: NaiveDate) -> anyhow::Result<()> {
    let response = api.release_desk(day).await?;
    info!("Released desk for {}: {}", date_to_str(day), response);
    Ok(())
}
