use review::{store::MemoryStore, ConfigBuilder, Identity, Reviews, SubmitReview};

pub fn create_reviews() -> Reviews {
    Reviews::new(MemoryStore::new())
}

pub fn create_reviews_with_batch_size(size: usize) -> Reviews {
    Reviews::with_config(
        MemoryStore::new(),
        ConfigBuilder::new().batch_size(size).comment_len(20).build(),
    )
}

pub fn john() -> Identity {
    Identity::new("u-john", "John Doe")
}

pub fn albert() -> Identity {
    Identity::new("u-albert", "Albert")
}

pub fn user(n: usize) -> Identity {
    Identity::new(format!("u-{n}"), format!("User {n}"))
}

pub async fn submit(reviews: &Reviews, identity: &Identity, product_id: &str, rating: i64) {
    reviews
        .submit(identity, &SubmitReview::new(product_id, rating))
        .await
        .unwrap();
}
