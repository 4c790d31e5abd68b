//! Background pricing requests for the interactive UI.
//!
//! Each submission runs on its own thread and reports back over a shared
//! channel. The UI loop polls without blocking. There is no cancellation or
//! de-duplication: if two requests are in flight, results are applied in
//! arrival order and the last one wins.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::error::DiamondError;
use crate::model::AttributeModel;
use crate::quote::{PricingService, Quote, QuoteSubmitter, SubmissionPayload};

/// A finished request.
#[derive(Debug)]
pub struct CompletedQuote {
    /// Submission number, starting at 1.
    pub ticket: u64,
    pub result: Result<Quote, DiamondError>,
}

pub struct BackgroundQuotes<S> {
    submitter: QuoteSubmitter<S>,
    sender: Sender<CompletedQuote>,
    receiver: Receiver<CompletedQuote>,
    issued: u64,
    in_flight: usize,
}

impl<S> BackgroundQuotes<S>
where
    S: PricingService + Clone + Send + 'static,
{
    pub fn new(submitter: QuoteSubmitter<S>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            submitter,
            sender,
            receiver,
            issued: 0,
            in_flight: 0,
        }
    }

    /// Capture the selection and price it on a worker thread.
    pub fn submit(&mut self, model: &AttributeModel) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        let ticket = self.issued;

        let payload = SubmissionPayload::from_model(model);
        let submitter = self.submitter.clone();
        let sender = self.sender.clone();
        tracing::info!(ticket, carat = payload.carat, "pricing request dispatched");

        thread::spawn(move || {
            let result = submitter.quote(&payload);
            // The receiver is gone only when the UI has exited.
            let _ = sender.send(CompletedQuote { ticket, result });
        });

        ticket
    }

    /// Next finished request, if any.
    pub fn poll(&mut self) -> Option<CompletedQuote> {
        match self.receiver.try_recv() {
            Ok(done) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if let Err(err) = &done.result {
                    tracing::warn!(ticket = done.ticket, error = %err, "pricing request failed");
                }
                Some(done)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{parse_response, PriceResponse, PriceSummary};
    use std::time::{Duration, Instant};

    #[derive(Debug, Clone)]
    struct FixedPricing(&'static str);

    impl PricingService for FixedPricing {
        fn price(&self, _payload: &SubmissionPayload) -> Result<PriceResponse, DiamondError> {
            parse_response(self.0)
        }
    }

    fn wait_for<S>(quotes: &mut BackgroundQuotes<S>) -> CompletedQuote
    where
        S: PricingService + Clone + Send + 'static,
    {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            if let Some(done) = quotes.poll() {
                return done;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("background quote did not complete");
    }

    #[test]
    fn results_arrive_through_poll() {
        let submitter = QuoteSubmitter::new(FixedPricing(r#"{"range":{"low":500,"high":1200}}"#), "/quote");
        let mut quotes = BackgroundQuotes::new(submitter);
        let model = AttributeModel::standard().unwrap();

        let ticket = quotes.submit(&model);
        assert_eq!(quotes.in_flight(), 1);
        let done = wait_for(&mut quotes);
        assert_eq!(done.ticket, ticket);
        assert_eq!(quotes.in_flight(), 0);
        let quote = done.result.unwrap();
        assert_eq!(quote.summary, PriceSummary::Range { low: 500.0, high: 1200.0 });
        assert_eq!(quote.url, "/quote?price_range=$500 to $1,200");
    }

    #[test]
    fn each_submission_gets_its_own_result() {
        let submitter = QuoteSubmitter::new(FixedPricing("not json"), "/quote");
        let mut quotes = BackgroundQuotes::new(submitter);
        let model = AttributeModel::standard().unwrap();

        quotes.submit(&model);
        quotes.submit(&model);
        let mut tickets = vec![wait_for(&mut quotes), wait_for(&mut quotes)]
            .into_iter()
            .map(|done| {
                assert!(matches!(done.result, Err(DiamondError::PayloadParse(_))));
                done.ticket
            })
            .collect::<Vec<_>>();
        tickets.sort();
        assert_eq!(tickets, vec![1, 2]);
        assert!(quotes.poll().is_none());
    }
}
