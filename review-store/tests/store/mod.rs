use std::time::Duration;

use futures_util::future::join_all;
use review_store::{ProductRating, Store, StoreError, WriteReview};
use tokio::time::sleep;

fn review(product_id: &str, user_id: &str, rating: u8) -> WriteReview {
    WriteReview::new(product_id, user_id)
        .user_name(format!("{user_id} name"))
        .rating(rating)
        .comment(format!("{user_id} on {product_id}"))
}

pub async fn init(store: &Store) -> anyhow::Result<()> {
    store.write(review("shoes", "john", 5)).await?;
    sleep(Duration::from_millis(5)).await;
    store.write(review("shoes", "albert", 2)).await?;
    store.write(review("hat", "john", 4)).await?;

    Ok(())
}

pub async fn test_write(store: &Store) -> anyhow::Result<()> {
    let (created, rating) = store.write(review("coat", "john", 4)).await?;

    assert_eq!(created.product_id, "coat");
    assert_eq!(created.user_id, "john");
    assert_eq!(created.user_name, "john name");
    assert_eq!(created.rating, 4);
    assert_eq!(
        rating,
        ProductRating {
            product_id: "coat".to_owned(),
            average_rating: 4.0,
            review_count: 1,
        }
    );

    let (_, rating) = store.write(review("coat", "albert", 1)).await?;
    assert_eq!(rating.average_rating, 2.5);
    assert_eq!(rating.review_count, 2);

    assert_eq!(store.rating("coat").await?, Some(rating));

    Ok(())
}

pub async fn test_duplicate(store: &Store) -> anyhow::Result<()> {
    let before = store.rating("shoes").await?;
    let err = store.write(review("shoes", "john", 1)).await.unwrap_err();

    assert!(matches!(err, StoreError::DuplicateReview));
    assert_eq!(store.rating("shoes").await?, before);
    assert_eq!(store.read("shoes").await?.len(), 2);

    Ok(())
}

pub async fn test_read(store: &Store) -> anyhow::Result<()> {
    let reviews = store.read("shoes").await?;

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].user_id, "albert");
    assert_eq!(reviews[1].user_id, "john");
    assert!(reviews[0].created_at >= reviews[1].created_at);

    assert!(store.read("unknown").await?.is_empty());

    Ok(())
}

pub async fn test_ratings(store: &Store) -> anyhow::Result<()> {
    let shoes = store.rating("shoes").await?.unwrap();
    assert_eq!(shoes.average_rating, 3.5);
    assert_eq!(shoes.review_count, 2);

    assert_eq!(store.rating("unknown").await?, None);

    let mut ratings = store
        .ratings(["hat", "unknown", "shoes", "hat"])
        .await?;
    ratings.sort_by(|a, b| a.product_id.cmp(&b.product_id));

    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0].product_id, "hat");
    assert_eq!(ratings[0].average_rating, 4.0);
    assert_eq!(ratings[1].product_id, "shoes");

    assert!(store.ratings(Vec::<String>::new()).await?.is_empty());

    Ok(())
}

pub async fn test_long_keys(store: &Store) -> anyhow::Result<()> {
    let product_id = "p".repeat(300);
    let user_id = "u".repeat(300);
    let name = "n".repeat(1000);

    let (created, rating) = store
        .write(WriteReview::new(&product_id, &user_id).user_name(&name).rating(3))
        .await?;

    assert_eq!(created.user_name, name);
    assert_eq!(rating.review_count, 1);
    assert_eq!(store.read(&product_id).await?.len(), 1);
    assert_eq!(store.rating(&product_id).await?, Some(rating));

    Ok(())
}

pub async fn test_concurrency(store: &Store) -> anyhow::Result<()> {
    let futures = (1..=20).map(|i| {
        let store = store.clone();

        async move {
            store
                .write(review("gloves", &format!("user-{i}"), (i % 5 + 1) as u8))
                .await
        }
    });

    for result in join_all(futures).await {
        result?;
    }

    let rating = store.rating("gloves").await?.unwrap();
    let reviews = store.read("gloves").await?;
    let expected = ProductRating::from_ratings("gloves", reviews.iter().map(|r| r.rating));

    assert_eq!(rating.review_count, 20);
    assert_eq!(reviews.len(), 20);
    assert_eq!(Some(rating), expected);

    let futures = (0..10).map(|_| {
        let store = store.clone();

        async move { store.write(review("scarf", "same-user", 3)).await }
    });

    let results = join_all(futures).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, StoreError::DuplicateReview)));
    assert_eq!(store.rating("scarf").await?.unwrap().review_count, 1);

    Ok(())
}
