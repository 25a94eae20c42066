use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::accessors::ContactAccessor;
use crate::domain::{ContactMessage, NewContactMessage};
use crate::errors::RemoteServiceError;
use crate::remote::RemoteDataService;

/// Write-only binding for contact messages, which are never read back
#[derive(Clone)]
pub struct ContactOutbox {
    accessor: ContactAccessor,
    sending: Arc<AtomicUsize>,
}

impl ContactOutbox {
    pub fn new(service: Arc<dyn RemoteDataService>) -> Self {
        Self {
            accessor: ContactAccessor::new(service),
            sending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn send(&self, message: &NewContactMessage) -> Result<ContactMessage, RemoteServiceError> {
        self.sending.fetch_add(1, Ordering::SeqCst);
        let result = self.accessor.insert_one(message).await;
        self.sending.fetch_sub(1, Ordering::SeqCst);
        result
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst) > 0
    }
}
