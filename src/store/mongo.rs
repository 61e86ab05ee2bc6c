use mongodb::bson::doc;
use mongodb::Client;

use super::StoreDriver;

/// [`StoreDriver`] backed by the official `mongodb` client.
///
/// `connect` parses the URI and builds a client; the driver opens sockets
/// lazily, so reachability is only proven by `ping`, which runs
/// `{ ping: 1 }` against the `admin` database.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoDriver;

impl StoreDriver for MongoDriver {
    type Handle = Client;
    type Error = mongodb::error::Error;

    async fn connect(&self, uri: &str) -> Result<Client, mongodb::error::Error> {
        Client::with_uri_str(uri).await
    }

    async fn ping(&self, client: &Client) -> Result<(), mongodb::error::Error> {
        client.database("admin").run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn disconnect(&self, client: Client) -> Result<(), mongodb::error::Error> {
        client.shutdown().await;
        Ok(())
    }
}
