use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use review::{Rating, DEFAULT_MAX_BATCH_SIZE};
use tokio::{sync::watch, task::JoinHandle, time::sleep};
use tracing::{debug, error, Instrument};

use crate::{config::ClientConfig, error::Result};

/// Source of product ratings for [`BatchRatings`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Ratings of the given products. Products without a rating are left out.
    async fn fetch(&self, product_ids: &'_ [String]) -> Result<HashMap<String, Rating>>;
}

/// What one consumer currently knows about the ratings it asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub ratings: HashMap<String, Rating>,
    pub is_loading: bool,
    batches: usize,
}

type Sender = Arc<watch::Sender<ViewState>>;

struct Subscriber {
    sender: Sender,
    product_ids: BTreeSet<String>,
}

#[derive(Default)]
struct Pending {
    product_ids: BTreeSet<String>,
    subscribers: Vec<Subscriber>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

/// Subscribers of one flushed batch, finished once its last chunk is fetched.
struct Batch {
    subscribers: Vec<Subscriber>,
    remaining: Mutex<usize>,
}

struct Inner {
    fetcher: Box<dyn Fetcher>,
    debounce: Duration,
    max_batch_size: usize,
    ratings: RwLock<HashMap<String, Rating>>,
    pending: Mutex<Pending>,
}

/// Process wide rating cache that coalesces lookups of many consumers into
/// debounced batch fetches.
///
/// Ratings are kept for the lifetime of the cache, nothing is evicted. Every
/// request restarts a single debounce timer, once it fires the union of the
/// pending uncached ids is fetched, split in chunks of at most
/// `max_batch_size` ids. A fetch that already started always completes, even
/// if newer requests come in meanwhile.
///
/// Requests must be made from within a tokio runtime.
#[derive(Clone)]
pub struct BatchRatings(Arc<Inner>);

impl BatchRatings {
    pub fn new<F: Fetcher + 'static>(fetcher: F, debounce: Duration) -> Self {
        Self::with_batch_size(fetcher, debounce, DEFAULT_MAX_BATCH_SIZE)
    }

    /// Same as [`BatchRatings::new`], sending at most `max_batch_size` ids
    /// per fetch. Should not exceed the server's own batch limit.
    pub fn with_batch_size<F: Fetcher + 'static>(
        fetcher: F,
        debounce: Duration,
        max_batch_size: usize,
    ) -> Self {
        Self(Arc::new(Inner {
            fetcher: Box::new(fetcher),
            debounce,
            max_batch_size: max_batch_size.max(1),
            ratings: RwLock::default(),
            pending: Mutex::default(),
        }))
    }

    /// Cache using the debounce and batch size of `config`.
    pub fn from_config<F: Fetcher + 'static>(fetcher: F, config: &ClientConfig) -> Self {
        Self::with_batch_size(fetcher, config.debounce, config.max_batch_size)
    }

    pub fn view(&self) -> RatingsView {
        let (sender, receiver) = watch::channel(ViewState::default());

        RatingsView {
            cache: self.clone(),
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn get(&self, product_id: &str) -> Option<Rating> {
        self.0.ratings.read().get(product_id).copied()
    }

    /// Stores a rating known from elsewhere, such as the response of a
    /// review submission. Views see it on their next request.
    pub fn insert(&self, product_id: impl Into<String>, rating: Rating) {
        self.0.ratings.write().insert(product_id.into(), rating);
    }

    pub fn len(&self) -> usize {
        self.0.ratings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.ratings.read().is_empty()
    }

    fn schedule(&self, sender: &Sender, product_ids: BTreeSet<String>) {
        let mut pending = self.0.pending.lock();

        match pending
            .subscribers
            .iter()
            .position(|s| Arc::ptr_eq(&s.sender, sender))
        {
            Some(index) => pending.subscribers[index]
                .product_ids
                .extend(product_ids.iter().cloned()),
            None => {
                sender.send_modify(|state| {
                    state.batches += 1;
                    state.is_loading = true;
                });

                pending.subscribers.push(Subscriber {
                    sender: sender.clone(),
                    product_ids: product_ids.clone(),
                });
            }
        }

        pending.product_ids.extend(product_ids);
        pending.generation += 1;

        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }

        let generation = pending.generation;
        let cache = self.clone();

        pending.timer = Some(tokio::spawn(
            async move {
                sleep(cache.0.debounce).await;
                cache.flush(generation);
            }
            .in_current_span(),
        ));
    }

    fn flush(&self, generation: u64) {
        let (product_ids, subscribers) = {
            let mut pending = self.0.pending.lock();

            // superseded by a later request
            if pending.generation != generation {
                return;
            }

            pending.timer = None;

            (
                std::mem::take(&mut pending.product_ids),
                std::mem::take(&mut pending.subscribers),
            )
        };

        let mut cached = HashMap::new();
        let mut missing = Vec::new();

        {
            let ratings = self.0.ratings.read();

            for id in product_ids {
                match ratings.get(&id) {
                    Some(rating) => {
                        cached.insert(id, *rating);
                    }
                    None => missing.push(id),
                }
            }
        }

        // cached by another batch since the request
        deliver(&subscribers, &cached);

        if missing.is_empty() {
            finish(&subscribers);

            return;
        }

        let chunks = missing
            .chunks(self.0.max_batch_size)
            .map(<[String]>::to_vec)
            .collect::<Vec<_>>();

        debug!(
            count = missing.len(),
            chunks = chunks.len(),
            "fetching product ratings batch"
        );

        let batch = Arc::new(Batch {
            subscribers,
            remaining: Mutex::new(chunks.len()),
        });

        for chunk in chunks {
            let cache = self.clone();
            let batch = batch.clone();

            tokio::spawn(
                async move {
                    cache.fetch(chunk, &batch).await;
                }
                .in_current_span(),
            );
        }
    }

    async fn fetch(&self, product_ids: Vec<String>, batch: &Batch) {
        match self.0.fetcher.fetch(&product_ids).await {
            Ok(found) => {
                debug!(
                    requested = product_ids.len(),
                    found = found.len(),
                    "product ratings batch loaded"
                );

                self.0
                    .ratings
                    .write()
                    .extend(found.iter().map(|(id, rating)| (id.to_owned(), *rating)));

                deliver(&batch.subscribers, &found);
            }
            Err(err) => {
                error!("failed to fetch product ratings {product_ids:?}: {err}");
            }
        }

        let last = {
            let mut remaining = batch.remaining.lock();
            *remaining = remaining.saturating_sub(1);
            *remaining == 0
        };

        if last {
            finish(&batch.subscribers);
        }
    }
}

/// Hands each subscriber the ratings it asked for.
fn deliver(subscribers: &[Subscriber], ratings: &HashMap<String, Rating>) {
    for subscriber in subscribers {
        let found = subscriber
            .product_ids
            .iter()
            .filter_map(|id| ratings.get(id).map(|rating| (id.to_owned(), *rating)))
            .collect::<Vec<_>>();

        if !found.is_empty() {
            subscriber
                .sender
                .send_modify(|state| state.ratings.extend(found));
        }
    }
}

/// Ends the batch of each subscriber.
fn finish(subscribers: &[Subscriber]) {
    for subscriber in subscribers {
        subscriber.sender.send_modify(|state| {
            state.batches = state.batches.saturating_sub(1);
            state.is_loading = state.batches > 0;
        });
    }
}

/// One consumer's projection of a [`BatchRatings`] cache.
pub struct RatingsView {
    cache: BatchRatings,
    sender: Sender,
    receiver: watch::Receiver<ViewState>,
}

impl RatingsView {
    /// Asks for the ratings of `product_ids`.
    ///
    /// Cached ratings are visible right away, the others arrive once the
    /// next batch fetch completes.
    pub fn request<I, S>(&self, product_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut hits = HashMap::new();
        let mut misses = BTreeSet::new();

        {
            let ratings = self.cache.0.ratings.read();

            for id in product_ids.into_iter().map(Into::into) {
                match ratings.get(&id) {
                    Some(rating) => {
                        hits.insert(id, *rating);
                    }
                    None => {
                        misses.insert(id);
                    }
                }
            }
        }

        debug!(hits = hits.len(), misses = misses.len(), "product ratings requested");

        if !hits.is_empty() {
            self.sender.send_modify(|state| state.ratings.extend(hits));
        }

        if !misses.is_empty() {
            self.cache.schedule(&self.sender, misses);
        }
    }

    pub fn get(&self, product_id: &str) -> Option<Rating> {
        self.receiver.borrow().ratings.get(product_id).copied()
    }

    pub fn snapshot(&self) -> HashMap<String, Rating> {
        self.receiver.borrow().ratings.clone()
    }

    pub fn state(&self) -> ViewState {
        self.receiver.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.receiver.borrow().is_loading
    }

    /// Waits until the view changes.
    pub async fn changed(&mut self) {
        // the sender lives as long as the view
        let _ = self.receiver.changed().await;
    }
}
