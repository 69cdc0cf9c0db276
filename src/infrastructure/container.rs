use std::sync::Arc;

use crate::{
    application::{
        ports::{
            AnswerSynthesizer, CleanupQueue, DocumentExtractor, EmbeddingProvider,
            RemoteFileFetcher, VectorIndex,
        },
        services::{
            Classifier, ClassifierConfig, Scorer, ScoringConfig, SessionLockRegistry,
            TextSplitter,
        },
        use_cases::{
            BatchRunUseCase, CreateSessionUseCase, DeleteDocumentUseCase, DeleteSessionUseCase,
            EmbedDocumentUseCase, ListDocumentsUseCase, QueryDocumentsUseCase,
            UploadDocumentUseCase,
        },
    },
    domain::repositories::{ChunkRepository, DocumentRepository, SessionRepository},
    infrastructure::{
        database::{
            create_connection_pool, get_connection_from_pool,
            repositories::{
                PostgresChunkRepository, PostgresDocumentRepository, PostgresSessionRepository,
            },
            run_migrations,
        },
        external_services::{
            CompositeDocumentExtractor, HttpAnswerSynthesizer, HttpEmbeddingProvider,
            HttpRemoteFileFetcher, HttpVectorIndex,
        },
        messaging::{CleanupWorker, MpscCleanupQueue},
    },
    presentation::http::{
        auth::AuthConfig,
        handlers::{BatchHandler, DocumentHandler, HealthHandler, QueryHandler, SessionHandler},
    },
};

pub struct AppContainer {
    // Repositories
    pub document_repository: Arc<dyn DocumentRepository>,
    pub chunk_repository: Arc<dyn ChunkRepository>,
    pub session_repository: Arc<dyn SessionRepository>,

    // External collaborators
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub answer_synthesizer: Arc<dyn AnswerSynthesizer>,
    pub document_extractor: Arc<dyn DocumentExtractor>,
    pub remote_fetcher: Arc<dyn RemoteFileFetcher>,

    // Coordination
    pub session_locks: Arc<SessionLockRegistry>,
    pub cleanup_queue: Arc<dyn CleanupQueue>,
    pub cleanup_worker: Arc<CleanupWorker>,

    // Use cases
    pub upload_document_use_case: Arc<UploadDocumentUseCase>,
    pub embed_document_use_case: Arc<EmbedDocumentUseCase>,
    pub query_documents_use_case: Arc<QueryDocumentsUseCase>,
    pub list_documents_use_case: Arc<ListDocumentsUseCase>,
    pub delete_document_use_case: Arc<DeleteDocumentUseCase>,
    pub create_session_use_case: Arc<CreateSessionUseCase>,
    pub delete_session_use_case: Arc<DeleteSessionUseCase>,
    pub batch_run_use_case: Arc<BatchRunUseCase>,

    // HTTP handlers
    pub document_handler: Arc<DocumentHandler>,
    pub session_handler: Arc<SessionHandler>,
    pub query_handler: Arc<QueryHandler>,
    pub batch_handler: Arc<BatchHandler>,
    pub health_handler: Arc<HealthHandler>,
    pub auth_config: Arc<AuthConfig>,
}

impl AppContainer {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Database
        let db_pool = create_connection_pool()?;
        let mut conn = get_connection_from_pool(&db_pool)?;
        run_migrations(&mut conn)?;
        drop(conn);

        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let chunk_repository: Arc<dyn ChunkRepository> =
            Arc::new(PostgresChunkRepository::new(db_pool.clone()));
        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(PostgresSessionRepository::new(db_pool));

        // External collaborators, all required at startup
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(HttpEmbeddingProvider::from_env()?);
        let vector_index: Arc<dyn VectorIndex> = Arc::new(HttpVectorIndex::from_env()?);
        let answer_synthesizer: Arc<dyn AnswerSynthesizer> =
            Arc::new(HttpAnswerSynthesizer::from_env()?);
        let document_extractor: Arc<dyn DocumentExtractor> = Arc::new(
            CompositeDocumentExtractor::new()
                .map_err(|e| format!("Failed to create document extractor: {}", e))?,
        );
        let remote_fetcher: Arc<dyn RemoteFileFetcher> = Arc::new(HttpRemoteFileFetcher::new()?);

        let auth_config = Arc::new(AuthConfig::from_env()?);

        // Pure decision components
        let confidence_floor = std::env::var("CLASSIFIER_CONFIDENCE_FLOOR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);
        let classifier = Classifier::new(ClassifierConfig { confidence_floor });
        let scorer = Scorer::new(ScoringConfig::default());
        let text_splitter = TextSplitter::default();

        // Coordination
        let session_locks = Arc::new(SessionLockRegistry::new());
        let (cleanup_queue, cleanup_receiver) = MpscCleanupQueue::create_pair();
        let cleanup_worker = Arc::new(CleanupWorker::new(
            cleanup_receiver,
            cleanup_queue.sender(),
            vector_index.clone(),
            session_locks.clone(),
        ));
        let cleanup_queue: Arc<dyn CleanupQueue> = Arc::new(cleanup_queue);

        // Use cases
        let upload_document_use_case = Arc::new(UploadDocumentUseCase::new(
            document_repository.clone(),
            chunk_repository.clone(),
            session_repository.clone(),
            document_extractor.clone(),
            classifier,
            text_splitter,
        ));

        let embed_document_use_case = Arc::new(EmbedDocumentUseCase::new(
            document_repository.clone(),
            chunk_repository.clone(),
            embedding_provider.clone(),
            vector_index.clone(),
        ));

        let query_documents_use_case = Arc::new(QueryDocumentsUseCase::new(
            document_repository.clone(),
            embedding_provider.clone(),
            vector_index.clone(),
            answer_synthesizer.clone(),
            cleanup_queue.clone(),
            session_locks.clone(),
            scorer,
        ));

        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(document_repository.clone()));

        let delete_document_use_case = Arc::new(DeleteDocumentUseCase::new(
            document_repository.clone(),
            chunk_repository.clone(),
            vector_index.clone(),
            session_locks.clone(),
        ));

        let create_session_use_case =
            Arc::new(CreateSessionUseCase::new(session_repository.clone()));

        let delete_session_use_case = Arc::new(DeleteSessionUseCase::new(
            session_repository.clone(),
            document_repository.clone(),
            chunk_repository.clone(),
            vector_index.clone(),
            session_locks.clone(),
        ));

        let batch_run_use_case = Arc::new(BatchRunUseCase::new(
            remote_fetcher.clone(),
            create_session_use_case.clone(),
            upload_document_use_case.clone(),
            embed_document_use_case.clone(),
            query_documents_use_case.clone(),
            delete_session_use_case.clone(),
        ));

        // HTTP handlers
        let document_handler = Arc::new(DocumentHandler::new(
            upload_document_use_case.clone(),
            embed_document_use_case.clone(),
            list_documents_use_case.clone(),
            delete_document_use_case.clone(),
        ));
        let session_handler = Arc::new(SessionHandler::new(
            create_session_use_case.clone(),
            delete_session_use_case.clone(),
        ));
        let query_handler = Arc::new(QueryHandler::new(query_documents_use_case.clone()));
        let batch_handler = Arc::new(BatchHandler::new(batch_run_use_case.clone()));
        let health_handler = Arc::new(HealthHandler::new(vector_index.clone()));

        Ok(Self {
            document_repository,
            chunk_repository,
            session_repository,
            embedding_provider,
            vector_index,
            answer_synthesizer,
            document_extractor,
            remote_fetcher,
            session_locks,
            cleanup_queue,
            cleanup_worker,
            upload_document_use_case,
            embed_document_use_case,
            query_documents_use_case,
            list_documents_use_case,
            delete_document_use_case,
            create_session_use_case,
            delete_session_use_case,
            batch_run_use_case,
            document_handler,
            session_handler,
            query_handler,
            batch_handler,
            health_handler,
            auth_config,
        })
    }
}
