use reqwest::{StatusCode, Url};
use tracing::{debug, instrument, warn};

use super::dto::{nutrient, ProductLookup};
use super::{Gateway, FOOD_DB};
use crate::error::{ApiError, ApiResult};
use crate::models::BarcodeProduct;

const FOUND: i64 = 1;
const UNKNOWN_PRODUCT: &str = "Unknown Product";

fn product_url(base: &str, code: &str) -> ApiResult<Url> {
    let mut url = Url::parse(base).map_err(|e| ApiError::Transport {
        service: FOOD_DB,
        message: format!("invalid base url: {e}"),
    })?;
    url.path_segments_mut()
        .map_err(|_| ApiError::Transport {
            service: FOOD_DB,
            message: "base url cannot hold a path".into(),
        })?
        .pop_if_empty()
        .extend(["api", "v0", "product", &format!("{code}.json")]);
    Ok(url)
}

/// Maps a lookup body to a product. Only `status == 1` yields a record.
pub(crate) fn normalize(code: &str, lookup: ProductLookup) -> ApiResult<BarcodeProduct> {
    if lookup.status != FOUND {
        return Err(ApiError::NotFound(format!("no product for barcode {code}")));
    }
    let product = lookup
        .product
        .ok_or_else(|| ApiError::Parse("status 1 without a product".into()))?;
    let name = product
        .product_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
    let n = &product.nutriments;
    Ok(BarcodeProduct {
        name,
        calories: n.calories(),
        protein: nutrient(&n.proteins_100g),
        carbs: nutrient(&n.carbohydrates_100g),
        fat: nutrient(&n.fat_100g),
        verified: true,
    })
}

impl Gateway {
    #[instrument(skip(self))]
    pub async fn lookup_barcode(&self, code: &str) -> ApiResult<BarcodeProduct> {
        let code = code.trim();
        let url = product_url(&self.config.food_db_base_url, code)?;
        debug!(%url, "barcode lookup");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(FOOD_DB, e))?;
        let status = response.status();
        // A missing product comes back as 404 with a `status: 0` body.
        if status == StatusCode::NOT_FOUND {
            debug!("barcode lookup returned 404");
            return Err(ApiError::NotFound(format!("no product for barcode {code}")));
        }
        if !status.is_success() {
            warn!(%status, "barcode lookup rejected");
            return Err(ApiError::Network {
                service: FOOD_DB,
                status: status.as_u16(),
            });
        }
        let lookup: ProductLookup = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        normalize(code, lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup(v: serde_json::Value) -> ProductLookup {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn url_escapes_the_code() {
        let url = product_url("https://world.openfoodfacts.org", "12/34").unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/api/v0/product/12%2F34.json"
        );
    }

    #[test]
    fn missing_status_is_not_found() {
        let err = normalize("1", lookup(json!({"product": {"product_name": "X"}}))).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn blank_name_becomes_unknown_product() {
        let p = normalize(
            "1",
            lookup(json!({"status": 1, "product": {"product_name": "  ", "nutriments": {}}})),
        )
        .unwrap();
        assert_eq!(p.name, "Unknown Product");
        assert_eq!(p.calories, 0.0);
        assert!(p.verified);
    }

    #[test]
    fn product_with_both_energy_keys_is_found() {
        let p = normalize(
            "42",
            lookup(json!({
                "status": 1,
                "product": {
                    "product_name": "Bar",
                    "nutriments": {"energy_kcal_100g": 200, "energy-kcal_100g": 200}
                }
            })),
        )
        .unwrap();
        assert_eq!(p.calories, 200.0);
    }

    #[test]
    fn scenario_test_bar() {
        let p = normalize(
            "12345",
            lookup(json!({
                "status": 1,
                "product": {"product_name": "Test Bar", "nutriments": {"energy_kcal_100g": 200}}
            })),
        )
        .unwrap();
        assert_eq!(
            p,
            BarcodeProduct {
                name: "Test Bar".into(),
                calories: 200.0,
                protein: 0.0,
                carbs: 0.0,
                fat: 0.0,
                verified: true,
            }
        );
    }
}
