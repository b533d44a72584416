use desk_client::DeskDirectory;
use tracing::info;

pub async fn run(directory: &DeskDirectory, query: &str) -> anyhow::Result<()> {
    let found = directory.search(query).await?;
    info!("{} employee(s) matching '{}'", found.len(), query);
    for employee in &found {
        info!("{} ({})", employee.name, employee.id);
    }
    Ok(())
}
