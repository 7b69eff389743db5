use std::env;

use dotenvy::dotenv;

use repairhub::{create_router, database::Database};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    // Open the document store
    let db_path = env::var("DB_PATH").unwrap_or_else(|_| "data/db.json".to_string());
    let db = Database::open(&db_path).expect("Failed to open document store");

    println!("Document store loaded from {}", db_path);

    // Build the application router
    let app = create_router(db);

    // Get port from environment or use default
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    println!("🔧 RepairHub server starting on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
