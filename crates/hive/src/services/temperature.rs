//! Average temperature across the configured sense boxes.

use std::sync::Arc;

use chrono::Utc;

use hive_core::sensebox::SenseBox;
use hive_core::storage::Repository;
use hive_core::temperature::{average_temperature, TemperatureReading};

/// Computes the current average temperature from a (cached) repository.
pub struct TemperatureService {
    repository: Arc<dyn Repository<SenseBox>>,
}

impl TemperatureService {
    pub fn new(repository: Arc<dyn Repository<SenseBox>>) -> Self {
        Self { repository }
    }

    /// Mean of the in-window readings, rounded to two decimals.
    pub async fn calculate_average(&self) -> Option<f64> {
        let sense_boxes = self.repository.find_all().await;
        let average = average_temperature(&sense_boxes, Utc::now());

        tracing::debug!(
            members = sense_boxes.len(),
            resolved = sense_boxes.iter().flatten().count(),
            average = ?average,
            "Calculated average temperature"
        );

        average
    }

    /// Average temperature with its classification.
    pub async fn get_temperature(&self) -> TemperatureReading {
        TemperatureReading::new(self.calculate_average().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sense_box, MockRepository};
    use chrono::TimeDelta;
    use hive_core::temperature::TemperatureStatus;

    async fn service(boxes: Vec<SenseBox>) -> TemperatureService {
        let ids: Vec<&str> = boxes.iter().map(|b| b.id.as_str()).collect();
        let repo = MockRepository::new(&ids);
        for sense_box in boxes.iter().cloned() {
            repo.insert(sense_box).await;
        }
        TemperatureService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_average_of_current_readings() {
        let now = Utc::now();
        let service = service(vec![
            sense_box("a", 4.0, now),
            sense_box("b", 4.5, now),
            sense_box("c", 5.0, now),
        ])
        .await;

        assert_eq!(service.calculate_average().await, Some(4.5));
    }

    #[tokio::test]
    async fn test_old_readings_are_ignored() {
        let now = Utc::now();
        let service = service(vec![
            sense_box("a", 20.0, now - TimeDelta::minutes(10)),
            sense_box("b", 90.0, now - TimeDelta::hours(2)),
        ])
        .await;

        let reading = service.get_temperature().await;
        assert_eq!(reading.temperature, Some(20.0));
        assert_eq!(reading.status, TemperatureStatus::Good);
    }

    #[tokio::test]
    async fn test_no_values_present() {
        let service = TemperatureService::new(Arc::new(MockRepository::new(&["a", "b"])));

        let reading = service.get_temperature().await;
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.status, TemperatureStatus::None);
    }

    #[tokio::test]
    async fn test_too_cold_and_too_hot() {
        let now = Utc::now();

        let cold = service(vec![sense_box("a", -5.0, now), sense_box("b", -10.0, now)]).await;
        let reading = cold.get_temperature().await;
        assert_eq!(reading.temperature, Some(-7.5));
        assert_eq!(reading.status, TemperatureStatus::TooCold);

        let hot = service(vec![sense_box("a", 38.0, now)]).await;
        assert_eq!(hot.get_temperature().await.status, TemperatureStatus::TooHot);
    }
}
