use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use quill_core::query::FilterExpression;
use quill_core::{AppError, FilterRequest, QueryError, QueryTranslator, ResultPage};
use quill_db::bson;
use quill_db::{DocumentStore, FindOptions, document_to_json};

use crate::metrics;
use crate::modules::blogs::model::{BLOGS_COLLECTION, Blog, CreateBlogDto, UpdateBlogDto};

fn blog_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("No Blog found with that ID"))
}

fn rejection_kind(error: &QueryError) -> &'static str {
    match error {
        QueryError::PageOutOfRange { .. } => "page_out_of_range",
        QueryError::MalformedFilter { .. } => "malformed_filter",
        QueryError::OperatorField { .. } => "operator_field",
    }
}

fn rejected(error: QueryError) -> QueryError {
    warn!(error = %error, "List query rejected");
    metrics::track_query_rejected(rejection_kind(&error));
    error
}

pub struct BlogService;

impl BlogService {
    #[instrument(skip(db, dto), fields(blog.title = %dto.title, db.operation = "INSERT", db.collection = BLOGS_COLLECTION))]
    pub async fn create_blog(db: &dyn DocumentStore, dto: CreateBlogDto) -> Result<Blog, AppError> {
        let status = dto.status.unwrap_or_default();
        let stored = db
            .insert_one(BLOGS_COLLECTION, dto.into_document(bson::DateTime::now()))
            .await?;
        let blog = Blog::from_document(stored)?;

        metrics::track_blog_created(status.as_str());
        info!(blog.id = %blog.id, "Blog created");

        Ok(blog)
    }

    /// Runs a list query: filter, sort, projection and pagination all come
    /// from the request parameters. Items are returned as JSON because the
    /// projection may drop any field.
    #[instrument(skip(db, translator), fields(db.operation = "FIND", db.collection = BLOGS_COLLECTION))]
    pub async fn get_blogs(
        db: &dyn DocumentStore,
        translator: &QueryTranslator,
        request: &FilterRequest,
    ) -> Result<ResultPage<Value>, AppError> {
        let plan = translator.plan(request).map_err(rejected)?;
        debug!(filter = ?plan.filter, sort = ?plan.sort, pagination = ?plan.pagination, "Query planned");

        let total = db.count(BLOGS_COLLECTION, &plan.filter).await?;
        let documents = db
            .find(BLOGS_COLLECTION, &plan.filter, FindOptions::from(&plan))
            .await?;
        let items = documents.into_iter().map(document_to_json).collect();

        let page = translator
            .assemble_page(items, total, &plan.pagination)
            .map_err(rejected)?;
        debug!(total, returned = page.items.len(), "Blogs listed");

        Ok(page)
    }

    #[instrument(skip(db), fields(db.operation = "FIND_ONE", db.collection = BLOGS_COLLECTION))]
    pub async fn get_blog(db: &dyn DocumentStore, id: &str) -> Result<Blog, AppError> {
        let document = db
            .find_one(BLOGS_COLLECTION, &FilterExpression::matching("_id", id))
            .await?
            .ok_or_else(blog_not_found)?;

        Ok(Blog::from_document(document)?)
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.collection = BLOGS_COLLECTION))]
    pub async fn update_blog(
        db: &dyn DocumentStore,
        id: &str,
        dto: UpdateBlogDto,
    ) -> Result<Blog, AppError> {
        let document = db
            .update_one(
                BLOGS_COLLECTION,
                &FilterExpression::matching("_id", id),
                dto.into_changes(bson::DateTime::now()),
            )
            .await?
            .ok_or_else(blog_not_found)?;

        metrics::track_blog_operation("update");
        info!(blog.id = %id, "Blog updated");

        Ok(Blog::from_document(document)?)
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.collection = BLOGS_COLLECTION))]
    pub async fn delete_blog(db: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
        db.delete_one(BLOGS_COLLECTION, &FilterExpression::matching("_id", id))
            .await?
            .ok_or_else(blog_not_found)?;

        metrics::track_blog_operation("delete");
        info!(blog.id = %id, "Blog deleted");

        Ok(())
    }
}
