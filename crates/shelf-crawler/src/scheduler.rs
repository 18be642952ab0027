use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use futures::pin_mut;
use tokio::time::timeout;

/// Source of the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub type JobFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + 'a>>;

struct Job<'a> {
    name: String,
    at: NaiveTime,
    next_run: NaiveDateTime,
    run: Box<dyn FnMut() -> JobFuture<'a> + 'a>,
}

/// Runs registered jobs once per day at a fixed local time.
///
/// Jobs run one after the other on the caller's task, a job is never started
/// while another one is still running.
pub struct Scheduler<'a, C> {
    clock: C,
    jobs: Vec<Job<'a>>,
}

impl<'a, C> Scheduler<'a, C>
where
    C: Clock,
{
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            jobs: vec![],
        }
    }

    pub fn every_day_at<J>(&mut self, at: NaiveTime, name: impl Into<String>, job: J)
    where
        J: FnMut() -> JobFuture<'a> + 'a,
    {
        let name = name.into();
        let next_run = next_occurrence(self.clock.now(), at);
        log::info!("Job {name} scheduled every day at {at}, next run at {next_run}");
        self.jobs.push(Job {
            name,
            at,
            next_run,
            run: Box::new(job),
        });
    }

    /// Earliest upcoming run among all jobs.
    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.jobs.iter().map(|job| job.next_run).min()
    }

    /// Runs every due job and returns how many ran.
    ///
    /// A job is rescheduled to its next daily occurrence after it ran, days
    /// missed in between are not caught up. A failing job is only logged.
    pub async fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        for job in self.jobs.iter_mut() {
            if self.clock.now() < job.next_run {
                continue;
            }

            log::info!("Running job {}", job.name);
            match (job.run)().await {
                Ok(()) => log::info!("Job {} done", job.name),
                Err(e) => log::error!("Job {} failed: {e:#}", job.name),
            }

            job.next_run = next_occurrence(self.clock.now(), job.at);
            log::info!("Job {} next run at {}", job.name, job.next_run);
            ran += 1;
        }
        ran
    }

    /// Checks for due jobs every `poll` until `stop` completes.
    ///
    /// `stop` is polled while idle only, a job already running is always
    /// allowed to finish.
    pub async fn run_until<S>(&mut self, poll: Duration, stop: S)
    where
        S: Future,
    {
        pin_mut!(stop);
        loop {
            match timeout(poll, &mut stop).await {
                Ok(_) => {
                    log::info!("Scheduler stopped");
                    return;
                }
                Err(_) => {
                    self.run_pending().await;
                }
            }
        }
    }
}

fn next_occurrence(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}
