use crate::backend::Backend;
use crate::error::CliError;

pub async fn run_create(backend: &Backend, slug: &str) -> Result<(), CliError> {
    let Backend::Local(store) = backend else {
        return Err(CliError::LocalStoreRequired);
    };

    let record = store.create(slug).await?;
    println!("{}", record.id);
    Ok(())
}
