use async_trait::async_trait;
use replicate_relay::{
    Error, Result,
    replicate::{CreatePredictionRequest, Prediction, PredictionClient},
};
use std::collections::VecDeque;
use std::sync::Mutex;

type Scripted = std::result::Result<Prediction, String>;

/// Mock prediction client for testing
///
/// Create and poll responses are consumed in order. The last scripted poll
/// response is repeated forever, which models a job that never finishes.
#[derive(Debug, Default)]
pub struct MockPredictionClient {
    creates: Mutex<VecDeque<Scripted>>,
    polls: Mutex<VecDeque<Scripted>>,
    created: Mutex<Vec<CreatePredictionRequest>>,
    polled: Mutex<Vec<String>>,
}

impl MockPredictionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_created(self, prediction: Prediction) -> Self {
        self.creates.lock().unwrap().push_back(Ok(prediction));
        self
    }

    pub fn with_create_error(self, message: &str) -> Self {
        self.creates
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_poll(self, prediction: Prediction) -> Self {
        self.polls.lock().unwrap().push_back(Ok(prediction));
        self
    }

    pub fn with_poll_error(self, message: &str) -> Self {
        self.polls.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn created_requests(&self) -> Vec<CreatePredictionRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn polled_ids(&self) -> Vec<String> {
        self.polled.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionClient for MockPredictionClient {
    async fn create_prediction(&self, request: &CreatePredictionRequest) -> Result<Prediction> {
        self.created.lock().unwrap().push(request.clone());

        match self.creates.lock().unwrap().pop_front() {
            Some(Ok(prediction)) => Ok(prediction),
            Some(Err(message)) => Err(Error::submission(message)),
            None => Err(Error::submission("No more mock create responses available")),
        }
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction> {
        self.polled.lock().unwrap().push(id.to_string());

        let mut polls = self.polls.lock().unwrap();
        let next = if polls.len() > 1 {
            polls.pop_front()
        } else {
            polls.front().cloned()
        };

        match next {
            Some(Ok(prediction)) => Ok(prediction),
            Some(Err(message)) => Err(Error::poll(message)),
            None => Err(Error::poll("No more mock poll responses available")),
        }
    }
}
