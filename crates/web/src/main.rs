use pickup::client::Client;
use store::{MemoryDatabase, StoreConfig};
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // store
    let database = MemoryDatabase::open(StoreConfig::from_env())
        .await
        .expect("could not open the game store.");

    // web server
    let state = WebState {
        pickup_client: Client::new(database),
    };
    if let Err(why) = start_web_server(state, WebConfig::from_env()).await {
        log::error!("web server stopped: {}", why);
    }
}
