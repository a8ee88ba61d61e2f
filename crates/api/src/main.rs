use vintrade_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    vintrade_observability::init(config.log_format);

    if config.pdf_converter.is_none() {
        tracing::warn!("VINTRADE_PDF_CONVERTER not set; PDF imports are disabled");
    }
    if config.data_dir.is_none() {
        tracing::warn!("VINTRADE_DATA_DIR not set; data is kept in memory only");
    }

    let app = app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
