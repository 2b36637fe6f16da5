use serde::{Deserialize, Serialize};

/// Average rating and review count of a single product, keyed by product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRating {
    pub product_id: String,
    pub average_rating: f64,
    pub review_count: u32,
}

impl ProductRating {
    /// Recomputes the aggregate from every rating of a product.
    ///
    /// Returns `None` when there is nothing to aggregate, a product without
    /// reviews has no rating at all rather than a zero one.
    pub fn from_ratings<I>(product_id: impl Into<String>, ratings: I) -> Option<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), rating| {
                (sum + u64::from(rating), count + 1)
            });

        Some(Self {
            product_id: product_id.into(),
            average_rating: round_average(sum, count)?,
            review_count: u32::try_from(count).ok()?,
        })
    }

    pub fn to_rating(&self) -> Rating {
        Rating {
            average_rating: self.average_rating,
            review_count: self.review_count,
        }
    }
}

/// Aggregate values without their product key, as served in batch lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub average_rating: f64,
    pub review_count: u32,
}

impl From<ProductRating> for Rating {
    fn from(value: ProductRating) -> Self {
        value.to_rating()
    }
}

/// Mean of `sum / count` rounded to one decimal, half away from zero.
///
/// The tie-break is applied on the exact fraction with integer arithmetic,
/// so `13 / 4` gives `3.3` and `63 / 20` gives `3.2`.
/// Formatting the float mean to one digit would give `3.1` for the latter,
/// this rounding deliberately does not follow it.
pub fn round_average(sum: u64, count: u64) -> Option<f64> {
    if count == 0 {
        return None;
    }

    // floor(10 * sum / count + 1/2)
    let tenths = (20 * sum + count) / (2 * count);

    Some(tenths as f64 / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_rating() {
        assert_eq!(round_average(0, 0), None);
        assert_eq!(ProductRating::from_ratings("p", Vec::new()), None);
    }

    #[test]
    fn single_rating() {
        let rating = ProductRating::from_ratings("p", [5]).unwrap();
        assert_eq!(rating.average_rating, 5.0);
        assert_eq!(rating.review_count, 1);
    }

    #[test]
    fn exact_halves_are_kept() {
        let rating = ProductRating::from_ratings("p", [5, 2]).unwrap();
        assert_eq!(rating.average_rating, 3.5);
        assert_eq!(rating.review_count, 2);
    }

    #[test]
    fn ties_round_up() {
        // 13 / 4 = 3.25, half-even would give 3.2
        let rating = ProductRating::from_ratings("p", [3, 3, 3, 4]).unwrap();
        assert_eq!(rating.average_rating, 3.3);

        // 63 / 20 = 3.15, not representable in binary floating point
        let ratings = std::iter::repeat(3).take(17).chain([4, 4, 4]);
        let rating = ProductRating::from_ratings("p", ratings).unwrap();
        assert_eq!(rating.average_rating, 3.2);
        assert_eq!(rating.review_count, 20);
    }

    #[test]
    fn non_ties_round_to_nearest() {
        // 10 / 3 = 3.333..
        assert_eq!(round_average(10, 3), Some(3.3));
        // 11 / 3 = 3.666..
        assert_eq!(round_average(11, 3), Some(3.7));
        // 14 / 3 = 4.666..
        assert_eq!(round_average(14, 3), Some(4.7));
        assert_eq!(round_average(1, 1), Some(1.0));
    }
}
