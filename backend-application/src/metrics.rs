use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    event_list_requests: AtomicU64,
    ranked_requests: AtomicU64,
    logins: AtomicU64,
    login_failures: AtomicU64,
    ingested_events: AtomicU64,
    ingested_alerts: AtomicU64,
    ingest_errors: AtomicU64,
}

impl Metrics {
    pub fn record_event_list(&self, ranked: bool) {
        self.event_list_requests.fetch_add(1, Ordering::Relaxed);
        if ranked {
            self.ranked_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_login(&self, success: bool) {
        if success {
            self.logins.fetch_add(1, Ordering::Relaxed);
        } else {
            self.login_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_ingest(&self, event_count: usize, alert_count: usize) {
        self.ingested_events
            .fetch_add(event_count as u64, Ordering::Relaxed);
        self.ingested_alerts
            .fetch_add(alert_count as u64, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("neston_event_list_requests_total", &self.event_list_requests),
            ("neston_ranked_event_requests_total", &self.ranked_requests),
            ("neston_logins_total", &self.logins),
            ("neston_login_failures_total", &self.login_failures),
            ("neston_ingested_events_total", &self.ingested_events),
            ("neston_ingested_alerts_total", &self.ingested_alerts),
            ("neston_ingest_errors_total", &self.ingest_errors),
        ];
        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {name} counter\n{name} {}\n",
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output_lists_counters() {
        let metrics = Metrics::default();
        metrics.record_event_list(true);
        metrics.record_event_list(false);
        metrics.record_login(false);
        let text = metrics.render_prometheus();
        assert!(text.contains("neston_event_list_requests_total 2\n"));
        assert!(text.contains("neston_ranked_event_requests_total 1\n"));
        assert!(text.contains("neston_login_failures_total 1\n"));
        assert!(text.contains("# TYPE neston_ingest_errors_total counter\n"));
    }
}
