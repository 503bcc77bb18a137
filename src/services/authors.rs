//! Authors service

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDetail, AuthorPayload},
    repository::Repository,
    validation,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Get an author together with the books referencing it
    pub async fn get_detail(&self, id: i64) -> AppResult<AuthorDetail> {
        let author = self.get_by_id(id).await?;
        let books = self.repository.books.get_by_author_id(id).await?;
        Ok(AuthorDetail::new(author, books))
    }

    /// Create an author. Invalid payloads are plain client errors here.
    pub async fn create(&self, payload: AuthorPayload) -> AppResult<Author> {
        let input = validation::validate_author(payload).map_err(AppError::InvalidInput)?;
        let author = self.repository.authors.insert(&input).await?;
        tracing::info!("Created author {}", author.author_id);
        Ok(author)
    }

    /// Replace an author's names
    pub async fn update(&self, id: i64, payload: AuthorPayload) -> AppResult<Author> {
        let input = validation::validate_author(payload).map_err(AppError::Validation)?;
        let mut author = self.get_by_id(id).await?;

        author.first_name = input.first_name;
        author.middle_name = input.middle_name;
        author.last_name = input.last_name;
        self.repository.authors.update_by_id(&author).await?;

        tracing::info!("Updated author {}", id);
        Ok(author)
    }

    /// Delete an author; its books go with it
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get_by_id(id).await?;
        self.repository.authors.delete_by_id(id).await?;
        tracing::info!("Deleted author {} and its books", id);
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        self.repository
            .authors
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} doesn't exist", id)))
    }
}
