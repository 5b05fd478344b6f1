// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use cs_core::protocol::{PushMessage, Topic};
use cs_core::{Movie, QueryMode};

use super::push::{PushTransport, TransportError, TransportFuture};
use super::remote::{PageRequest, PageResponse, Remote, RemoteError, RemoteFuture};

/// Create a test movie with the given id and title.
pub fn movie(id: i64, title: &str) -> Movie {
    Movie::new(id, title, 3.0, "A test movie", "Drama")
}

/// Create a test movie with an explicit category and rating.
pub fn movie_with(id: i64, title: &str, category: &str, rating: f64) -> Movie {
    Movie::new(id, title, rating, "A test movie", category)
}

/// Ids of a slice of movies, in order.
pub fn ids(movies: &[Movie]) -> Vec<i64> {
    movies.iter().map(|m| m.id).collect()
}

#[derive(Default)]
struct FakeState {
    movies: Vec<Movie>,
    next_id: i64,
    down: bool,
    rejected: HashSet<i64>,
    echo_create: bool,
    calls: Vec<String>,
}

/// In-memory catalog service.
///
/// Honours the plain/filter/sort listing semantics: the plain listing
/// carries an explicit "more remains" flag, the other two do not.
#[derive(Clone, Default)]
pub struct FakeRemote {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        let remote = FakeRemote::default();
        remote.state.lock().unwrap().next_id = 1;
        remote
    }

    /// Seed the server; new ids continue after the highest seeded id.
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        let remote = FakeRemote::new();
        {
            let mut state = remote.state.lock().unwrap();
            state.next_id = movies.iter().map(|m| m.id).max().unwrap_or(0) + 1;
            state.movies = movies;
        }
        remote
    }

    /// Make every call fail as if the server were unreachable.
    pub fn set_down(&self, down: bool) {
        self.state.lock().unwrap().down = down;
    }

    /// Reject update/delete calls targeting `id`.
    pub fn reject_target(&self, id: i64) {
        self.state.lock().unwrap().rejected.insert(id);
    }

    /// Echo the created entity in the create response.
    pub fn set_echo_create(&self, echo: bool) {
        self.state.lock().unwrap().echo_create = echo;
    }

    /// Server state ordered by id.
    pub fn movies(&self) -> Vec<Movie> {
        let mut movies = self.state.lock().unwrap().movies.clone();
        movies.sort_by_key(|m| m.id);
        movies
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: String) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.down {
            return Err(RemoteError::ServerUnreachable("fake server down".into()));
        }
        Ok(())
    }

    fn check_target(&self, id: i64) -> Result<usize, RemoteError> {
        let state = self.state.lock().unwrap();
        if state.rejected.contains(&id) {
            return Err(RemoteError::RequestRejected { status: 400 });
        }
        state
            .movies
            .iter()
            .position(|m| m.id == id)
            .ok_or(RemoteError::RequestRejected { status: 404 })
    }
}

impl Remote for FakeRemote {
    fn health(&self) -> RemoteFuture<'_, ()> {
        Box::pin(async move { self.record("health".into()) })
    }

    fn list_page(&self, request: PageRequest) -> RemoteFuture<'_, PageResponse> {
        Box::pin(async move {
            self.record(format!("list {} {}", request.mode(), request.page))?;
            let all = self.movies();
            let result = request.query.evaluate(&all);
            let start = (request.page * request.size) as usize;
            let items: Vec<Movie> = result
                .iter()
                .skip(start)
                .take(request.size as usize)
                .cloned()
                .collect();
            let more = start + items.len() < result.len();
            match request.mode() {
                QueryMode::Plain => Ok((items, Some(more))),
                QueryMode::Filter | QueryMode::Sort => Ok((items, None)),
            }
        })
    }

    fn fetch_one(&self, id: i64) -> RemoteFuture<'_, Movie> {
        Box::pin(async move {
            self.record(format!("fetch {}", id))?;
            let idx = self.check_target(id)?;
            Ok(self.state.lock().unwrap().movies[idx].clone())
        })
    }

    fn create(&self, movie: Movie) -> RemoteFuture<'_, Option<Movie>> {
        Box::pin(async move {
            self.record(format!("create {}", movie.title))?;
            let mut state = self.state.lock().unwrap();
            let created = movie.with_id(state.next_id);
            state.next_id += 1;
            state.movies.push(created.clone());
            Ok(state.echo_create.then_some(created))
        })
    }

    fn update(&self, id: i64, movie: Movie) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            self.record(format!("update {}", id))?;
            let idx = self.check_target(id)?;
            self.state.lock().unwrap().movies[idx] = movie.with_id(id);
            Ok(())
        })
    }

    fn delete(&self, id: i64) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            self.record(format!("delete {}", id))?;
            let idx = self.check_target(id)?;
            self.state.lock().unwrap().movies.remove(idx);
            Ok(())
        })
    }
}

#[derive(Default)]
struct PushState {
    connected: bool,
    connect_fail: bool,
    /// `None` entries simulate the server closing the connection.
    incoming: VecDeque<Option<PushMessage>>,
    subscriptions: Vec<Topic>,
    connects: u32,
    disconnects: u32,
}

/// Mock push transport for testing without real sockets.
///
/// With nothing queued, recv() stays pending like an idle connection.
#[derive(Clone, Default)]
pub struct MockPush {
    state: Arc<Mutex<PushState>>,
}

impl MockPush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message that will be returned by recv().
    pub fn queue_message(&self, msg: PushMessage) {
        self.state.lock().unwrap().incoming.push_back(Some(msg));
    }

    /// Make a later recv() report the connection as closed.
    pub fn queue_close(&self) {
        self.state.lock().unwrap().incoming.push_back(None);
    }

    pub fn set_connect_fail(&self, fail: bool) {
        self.state.lock().unwrap().connect_fail = fail;
    }

    pub fn subscriptions(&self) -> Vec<Topic> {
        self.state.lock().unwrap().subscriptions.clone()
    }

    pub fn connects(&self) -> u32 {
        self.state.lock().unwrap().connects
    }

    pub fn disconnects(&self) -> u32 {
        self.state.lock().unwrap().disconnects
    }

    pub fn connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }
}

impl PushTransport for MockPush {
    fn connect(&mut self, _url: &str) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.connects += 1;
            if state.connect_fail {
                return Err(TransportError::ConnectionFailed("mock failure".into()));
            }
            state.connected = true;
            state.subscriptions.clear();
            Ok(())
        })
    }

    fn subscribe(&mut self, topic: Topic) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if !state.connected {
                return Err(TransportError::ConnectionClosed);
            }
            state.subscriptions.push(topic);
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<PushMessage>> {
        Box::pin(async move {
            let next = {
                let mut state = self.state.lock().unwrap();
                if !state.connected {
                    return Err(TransportError::ConnectionClosed);
                }
                state.incoming.pop_front()
            };
            match next {
                Some(Some(msg)) => Ok(Some(msg)),
                Some(None) => {
                    self.state.lock().unwrap().connected = false;
                    Ok(None)
                }
                None => std::future::pending().await,
            }
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if state.connected {
                state.disconnects += 1;
            }
            state.connected = false;
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.connected()
    }
}
