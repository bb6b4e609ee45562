use lettings_store::prelude::*;

use super::models::{Address, Letting};

/// Every letting, oldest first.
pub async fn list(conn: &Connection) -> Result<Vec<Letting>, Error> {
    Letting::all(conn).await
}

/// The letting with its address, or `None` when `id` is unknown.
pub async fn get(id: i64, conn: &Connection) -> Result<Option<(Letting, Address)>, Error> {
    let Some(letting) = Letting::get(kwargs!(id = id), conn).await? else {
        return Ok(None);
    };
    let address = Address::get(kwargs!(id = letting.address), conn).await?;
    Ok(address.map(|address| (letting, address)))
}
