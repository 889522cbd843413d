use super::{segment, with_cursor, ApiClient, MediaUpload, PostDto, PostListResponse};
use crate::error::ApiError;
use crate::models::Post;
use crate::traits::MultipartForm;

impl ApiClient {
    /// GET posts/feed
    pub async fn feed(&self, cursor: Option<&str>) -> Result<PostListResponse, ApiError> {
        self.get(&with_cursor("posts/feed".to_string(), cursor)).await
    }

    /// GET posts?search=
    pub async fn search_posts(
        &self,
        search: &str,
        cursor: Option<&str>,
    ) -> Result<PostListResponse, ApiError> {
        let path = format!("posts?search={}", urlencoding::encode(search));
        self.get(&with_cursor(path, cursor)).await
    }

    /// GET posts/{id}
    pub async fn get_post(&self, id: &str) -> Result<Post, ApiError> {
        let dto: PostDto = self.get(&format!("posts/{}", segment(id))).await?;
        Ok(dto.into())
    }

    /// POST posts (multipart). Either part may be absent.
    pub async fn create_post(
        &self,
        text: Option<&str>,
        file: Option<&MediaUpload>,
    ) -> Result<Post, ApiError> {
        let mut form = MultipartForm::new();
        if let Some(text) = text {
            form = form.text("text", text);
        }
        if let Some(file) = file {
            form = form.file(
                "file",
                file.filename.as_str(),
                file.mime_type.as_str(),
                file.bytes.clone(),
            );
        }
        let dto: PostDto = self.post_form("posts", form).await?;
        Ok(dto.into())
    }

    /// POST posts/{id}/like
    pub async fn toggle_like(&self, id: &str) -> Result<Post, ApiError> {
        let dto: PostDto = self.post_empty(&format!("posts/{}/like", segment(id))).await?;
        Ok(dto.into())
    }

    /// POST posts/{id}/retweet
    pub async fn toggle_retweet(&self, id: &str) -> Result<Post, ApiError> {
        let dto: PostDto = self
            .post_empty(&format!("posts/{}/retweet", segment(id)))
            .await?;
        Ok(dto.into())
    }

    /// DELETE posts/{id}
    pub async fn delete_post(&self, id: &str) -> Result<Post, ApiError> {
        let dto: PostDto = self.delete(&format!("posts/{}", segment(id))).await?;
        Ok(dto.into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::api::test_support::{page_json, post_json, BASE};

    #[tokio::test]
    async fn test_feed_with_cursor() {
        let http = Arc::new(MockHttpClient::new());
        http.set_response(
            "https://api.test/v1/posts/feed",
            MockResponse::json(
                200,
                &page_json(vec![post_json("p1", "u1", "2021-01-01T00:00:00Z")], true),
            ),
        );
        let api = ApiClient::new(BASE, http.clone());

        let page = api.feed(Some("2021-02-01T00:00:00Z")).await.unwrap();
        assert!(page.has_more);
        assert_eq!(page.into_posts()[0].profile.username, "useru1");
        assert_eq!(
            http.get_requests()[0].url,
            "https://api.test/v1/posts/feed?cursor=2021-02-01T00%3A00%3A00Z"
        );
    }

    #[tokio::test]
    async fn test_search_encodes_hashtag() {
        let http = Arc::new(MockHttpClient::new());
        http.set_default_response(MockResponse::json(200, &page_json(vec![], false)));
        let api = ApiClient::new(BASE, http.clone());

        api.search_posts("#rust", None).await.unwrap();
        assert_eq!(
            http.get_requests()[0].url,
            "https://api.test/v1/posts?search=%23rust"
        );
    }

    #[tokio::test]
    async fn test_create_post_parts() {
        let http = Arc::new(MockHttpClient::new());
        http.set_default_response(MockResponse::json(
            201,
            &post_json("p9", "u1", "2021-01-01T00:00:00Z"),
        ));
        let api = ApiClient::new(BASE, http.clone());

        let upload = MediaUpload::new("a.jpg", "image/jpg", Bytes::from_static(b"\xff"));
        let post = api.create_post(None, Some(&upload)).await.unwrap();
        assert_eq!(post.id, "p9");

        let form = http.get_requests()[0].form.clone().unwrap();
        assert!(form.has_part("file"));
        assert!(!form.has_part("text"));
    }

    #[tokio::test]
    async fn test_toggle_and_delete_paths() {
        let http = Arc::new(MockHttpClient::new());
        http.set_default_response(MockResponse::json(
            200,
            &post_json("p1", "u1", "2021-01-01T00:00:00Z"),
        ));
        let api = ApiClient::new(BASE, http.clone());

        api.toggle_like("p1").await.unwrap();
        api.toggle_retweet("p1").await.unwrap();
        api.delete_post("p1").await.unwrap();

        let requests = http.get_requests();
        assert_eq!(requests[0].url, "https://api.test/v1/posts/p1/like");
        assert_eq!(requests[1].url, "https://api.test/v1/posts/p1/retweet");
        assert_eq!(requests[2].method, "DELETE");
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let http = Arc::new(MockHttpClient::new());
        http.set_method_response(
            "DELETE",
            "https://api.test/v1/posts/gone",
            MockResponse::status(404, ""),
        );
        let api = ApiClient::new(BASE, http);
        assert!(api.delete_post("gone").await.unwrap_err().is_not_found());
    }
}
