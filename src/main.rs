// region:    --- Imports
use commerce_auctions::auction::events::{EventPublisher, LogPublisher};
use commerce_auctions::config::AppConfig;
use commerce_auctions::database::DatabaseManager;
use commerce_auctions::handlers::{self, AppState};
use commerce_auctions::message_broker::KafkaProducer;
use commerce_auctions::store::{AuctionStore, InMemoryAuctionStore, PostgresAuctionStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = AppConfig::from_env()?;
    info!("{:<12} --> 설정 로드 완료: policy={:?}", "Main", config.policy);

    // 저장소 생성 (DATABASE_URL 이 없으면 인메모리)
    let store: Arc<dyn AuctionStore> = match &config.database_url {
        Some(database_url) => {
            let db_manager =
                Arc::new(DatabaseManager::connect(database_url, config.db_max_connections).await?);
            if let Err(e) = db_manager.initialize_database(config.reset_database).await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresAuctionStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 이 없어 인메모리 저장소를 사용합니다.",
                "Main"
            );
            Arc::new(InMemoryAuctionStore::new())
        }
    };

    // 이벤트 발행자 생성 (KAFKA_BROKERS 가 없으면 로그만)
    let publisher: Arc<dyn EventPublisher> = match &config.kafka_brokers {
        Some(brokers) => {
            let producer = KafkaProducer::new(brokers, &config.events_topic)?;
            // 이미 있는 토픽이면 실패해도 계속 진행
            if let Err(e) = producer.create_topic(5, 1).await {
                warn!("{:<12} --> {}", "Main", e);
            }
            info!("{:<12} --> Kafka 초기화 성공", "Main");
            Arc::new(producer)
        }
        None => Arc::new(LogPublisher),
    };

    // 라우터 설정
    let routes_all = handlers::router(AppState::new(store, publisher, config.policy));

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
