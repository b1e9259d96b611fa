//! Background request loader
//!
//! Backend calls run on one worker thread so drawing never waits on them.
//! Requests are served in the order they were submitted. The UI side keeps
//! the send time of every outstanding request; once one has been pending
//! longer than the request timeout it is abandoned, and a reply that shows
//! up afterwards is dropped.

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::{FinError, FinResult};
use crate::models::{AuthToken, BudgetGoal, Deposit, GoalId, RecurringExpense};
use crate::services::{fetch_period, FetchTicket, PeriodData, RegistryTicket};

/// A backend mutation run on the worker; the `String` is the status line
pub type MutateFn = Box<dyn FnOnce(&dyn Backend, &AuthToken) -> FinResult<String> + Send>;

/// Stores that must be reloaded after a mutation is acknowledged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Transactions,
    Recurring,
    Goals,
    Deposits(GoalId),
}

/// Work for the loader thread
pub enum Request {
    Transactions(FetchTicket),
    Recurring(RegistryTicket),
    Goals(RegistryTicket),
    Deposits(GoalId),
    Mutate {
        label: String,
        reload: Vec<Resource>,
        op: MutateFn,
    },
}

impl Request {
    fn label(&self) -> String {
        match self {
            Request::Transactions(ticket) => format!("transactions for {}", ticket.period),
            Request::Recurring(_) => "fixed expenses".into(),
            Request::Goals(_) => "goals".into(),
            Request::Deposits(goal_id) => format!("ledger of {}", goal_id),
            Request::Mutate { label, .. } => label.clone(),
        }
    }
}

/// Result of a request, as handed back to the UI
pub enum Payload {
    Transactions(FetchTicket, FinResult<PeriodData>),
    Recurring(RegistryTicket, FinResult<Vec<RecurringExpense>>),
    Goals(RegistryTicket, FinResult<Vec<BudgetGoal>>),
    Deposits(GoalId, FinResult<Vec<Deposit>>),
    Mutated {
        label: String,
        reload: Vec<Resource>,
        result: FinResult<String>,
    },
}

pub struct Reply {
    pub id: u64,
    pub payload: Payload,
}

/// A request abandoned after the timeout
#[derive(Debug)]
pub struct Expired {
    pub id: u64,
    pub label: String,
    pub error: FinError,
}

struct Job {
    id: u64,
    token: AuthToken,
    request: Request,
}

struct Pending {
    sent_at: Instant,
    label: String,
}

/// Handle to the loader thread
pub struct Loader {
    jobs: mpsc::Sender<Job>,
    replies: mpsc::Receiver<Reply>,
    pending: HashMap<u64, Pending>,
    next_id: u64,
    timeout: Duration,
    #[allow(dead_code)]
    worker: thread::JoinHandle<()>,
}

impl Loader {
    /// Start the worker thread
    pub fn spawn(backend: Arc<dyn Backend>, timeout: Duration) -> Self {
        let (jobs, job_rx) = mpsc::channel::<Job>();
        let (reply_tx, replies) = mpsc::channel();

        let worker = thread::spawn(move || {
            for job in job_rx {
                let payload = serve(backend.as_ref(), &job.token, job.request);
                if reply_tx.send(Reply { id: job.id, payload }).is_err() {
                    return;
                }
            }
        });

        Self {
            jobs,
            replies,
            pending: HashMap::new(),
            next_id: 1,
            timeout,
            worker,
        }
    }

    /// Queue a request; returns its id
    pub fn submit(&mut self, token: AuthToken, request: Request) -> FinResult<u64> {
        let id = self.next_id;
        self.next_id += 1;
        let label = request.label();

        self.jobs
            .send(Job { id, token, request })
            .map_err(|_| FinError::Transport("Request loader has stopped".into()))?;

        debug!(id, %label, "request queued");
        self.pending.insert(
            id,
            Pending {
                sent_at: Instant::now(),
                label,
            },
        );
        Ok(id)
    }

    /// Replies that arrived since the last call, minus abandoned ones
    pub fn poll(&mut self) -> Vec<Reply> {
        let mut ready = Vec::new();
        while let Ok(reply) = self.replies.try_recv() {
            if self.pending.remove(&reply.id).is_some() {
                ready.push(reply);
            } else {
                debug!(id = reply.id, "dropping reply for abandoned request");
            }
        }
        ready
    }

    /// Abandon requests pending longer than the timeout as of `now`
    pub fn expire(&mut self, now: Instant) -> Vec<Expired> {
        let timeout = self.timeout;
        let mut ids: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, p)| now.saturating_duration_since(p.sent_at) >= timeout)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();

        ids.into_iter()
            .filter_map(|id| self.pending.remove(&id).map(|p| (id, p)))
            .map(|(id, pending)| {
                warn!(id, label = %pending.label, "request timed out");
                Expired {
                    id,
                    error: FinError::Transport(format!(
                        "Loading {} timed out after {}s",
                        pending.label,
                        timeout.as_secs()
                    )),
                    label: pending.label,
                }
            })
            .collect()
    }

    /// Number of requests still awaiting a reply
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }
}

fn serve(backend: &dyn Backend, token: &AuthToken, request: Request) -> Payload {
    match request {
        Request::Transactions(ticket) => {
            Payload::Transactions(ticket, fetch_period(backend, token, ticket.period))
        }
        Request::Recurring(ticket) => Payload::Recurring(ticket, backend.list_recurring(token)),
        Request::Goals(ticket) => Payload::Goals(ticket, backend.list_goals(token)),
        Request::Deposits(goal_id) => Payload::Deposits(goal_id, backend.list_deposits(token, goal_id)),
        Request::Mutate { label, reload, op } => Payload::Mutated {
            label,
            reload,
            result: op(backend, token),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::local::tests::{login, open_backend, EMAIL};
    use crate::models::{Money, NewRecurringExpense};
    use tempfile::TempDir;

    fn wait_for(loader: &mut Loader, count: usize) -> Vec<Reply> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut replies = Vec::new();
        while replies.len() < count && Instant::now() < deadline {
            replies.extend(loader.poll());
            thread::sleep(Duration::from_millis(5));
        }
        replies
    }

    fn setup(temp_dir: &TempDir) -> (Loader, AuthToken) {
        let (backend, outbox) = open_backend(temp_dir);
        let token = login(&backend, &outbox, EMAIL);
        (Loader::spawn(Arc::new(backend), Duration::from_secs(60)), token)
    }

    #[test]
    fn test_mutation_reply_precedes_later_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let (mut loader, token) = setup(&temp_dir);

        let mutate = loader
            .submit(
                token.clone(),
                Request::Mutate {
                    label: "add rent".into(),
                    reload: vec![Resource::Recurring],
                    op: Box::new(|backend, token| {
                        let created = backend.create_recurring(
                            token,
                            NewRecurringExpense {
                                title: "Rent".into(),
                                amount: Money::from_units(900),
                                category: "utilities".into(),
                                day_of_month: 1,
                            },
                        )?;
                        Ok(format!("Added {}", created.title))
                    }),
                },
            )
            .unwrap();
        let fetch = loader
            .submit(token, Request::Recurring(RegistryTicket { generation: 1 }))
            .unwrap();

        let replies = wait_for(&mut loader, 2);
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].id, mutate);
        assert_eq!(replies[1].id, fetch);

        match &replies[1].payload {
            Payload::Recurring(_, Ok(items)) => assert_eq!(items.len(), 1),
            _ => panic!("expected fixed expenses"),
        }
        assert!(!loader.is_busy());
    }

    #[test]
    fn test_expired_request_reply_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let (mut loader, token) = setup(&temp_dir);

        let first = loader
            .submit(token.clone(), Request::Goals(RegistryTicket { generation: 1 }))
            .unwrap();
        let expired = loader.expire(Instant::now() + Duration::from_secs(61));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, first);
        assert!(expired[0].error.is_transport());

        let second = loader
            .submit(token, Request::Goals(RegistryTicket { generation: 2 }))
            .unwrap();
        let replies = wait_for(&mut loader, 1);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id, second);
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn test_fresh_request_is_not_expired() {
        let temp_dir = TempDir::new().unwrap();
        let (mut loader, token) = setup(&temp_dir);

        loader
            .submit(token, Request::Goals(RegistryTicket { generation: 1 }))
            .unwrap();
        assert!(loader.expire(Instant::now()).is_empty());
    }

    #[test]
    fn test_auth_failure_is_returned_not_raised() {
        let temp_dir = TempDir::new().unwrap();
        let (mut loader, _) = setup(&temp_dir);

        loader
            .submit(
                AuthToken::new("bogus".to_string()),
                Request::Goals(RegistryTicket { generation: 1 }),
            )
            .unwrap();
        let replies = wait_for(&mut loader, 1);
        match &replies[0].payload {
            Payload::Goals(_, Err(e)) => assert!(e.is_auth()),
            _ => panic!("expected an auth error"),
        }
    }
}
