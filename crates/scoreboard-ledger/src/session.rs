use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use scoreboard_gate::AccessGate;
use scoreboard_store::TableStore;
use scoreboard_types::{Direction, MemberName, Unit};

use crate::config::{SessionConfig, WriteFailurePolicy};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::load::{load, LoadOutcome, LoadSource};
use crate::ranking::RankedView;
use crate::request::DeltaRequest;

/// Result of a successful [`Session::apply`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppliedDelta {
    pub name: MemberName,
    pub direction: Direction,
    pub previous: f64,
    pub current: f64,
    /// `false` only when a write failure was swallowed.
    pub persisted: bool,
}

/// Explicit application state for one scoreboard.
///
/// A session owns the in-memory ledger, the store it persists to and the gate
/// guarding mutations. Each mutation is a synchronous
/// authorize, apply, persist cycle; nothing runs in the background.
pub struct Session {
    store: Arc<dyn TableStore>,
    gate: AccessGate,
    config: SessionConfig,
    ledger: Ledger,
    source: LoadSource,
}

impl Session {
    /// Load the ledger from `store` and start a session.
    ///
    /// Loading fails open; check [`Session::source`] to see whether the data
    /// came from the store. A session on fallback data can be read but
    /// refuses mutations until a [`Session::reload`] succeeds.
    pub fn open(store: Arc<dyn TableStore>, gate: AccessGate, config: SessionConfig) -> Self {
        let LoadOutcome { ledger, source } = load(store.as_ref(), &config.roster);
        Self {
            store,
            gate,
            config,
            ledger,
            source,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn TableStore {
        self.store.as_ref()
    }

    /// Re-read the store.
    ///
    /// If the store cannot be read the current ledger is kept, so a transient
    /// failure never replaces real totals with a zeroed roster.
    pub fn reload(&mut self) -> LoadSource {
        let LoadOutcome { ledger, source } = load(self.store.as_ref(), &self.config.roster);
        if source.is_fallback() {
            warn!("reload failed; keeping current ledger");
        } else {
            self.ledger = ledger;
            self.source = source.clone();
        }
        source
    }

    /// Authorize, apply, and persist one delta.
    ///
    /// A rejected code or unknown member leaves the ledger untouched, and so
    /// does a session whose load fell back. When the
    /// write fails, [`WriteFailurePolicy::Surface`] rolls the change back and
    /// returns the error; [`WriteFailurePolicy::Swallow`] keeps it and reports
    /// `persisted: false`.
    pub fn apply(
        &mut self,
        request: &DeltaRequest,
        code: Option<&str>,
    ) -> Result<AppliedDelta, LedgerError> {
        let access = self.gate.authorize(code)?;
        if let LoadSource::Fallback { reason } = &self.source {
            warn!(member = %request.name(), "mutation refused; ledger was not loaded from the store");
            return Err(LedgerError::StoreUnreadable(reason.clone()));
        }
        let (previous, current) = self.ledger.apply(request)?;

        let persisted = match self.store.write(&self.ledger.to_table()) {
            Ok(()) => true,
            Err(e) => match self.config.on_write_failure {
                WriteFailurePolicy::Surface => {
                    self.ledger.restore(request.name(), previous);
                    return Err(e.into());
                }
                WriteFailurePolicy::Swallow => {
                    warn!(error = %e, member = %request.name(), "write failed; change kept in memory only");
                    false
                }
            },
        };

        info!(
            member = %request.name(),
            direction = %request.direction(),
            delta = request.delta(),
            previous,
            current,
            persisted,
            ?access,
            "delta applied"
        );

        Ok(AppliedDelta {
            name: request.name().clone(),
            direction: request.direction(),
            previous,
            current,
            persisted,
        })
    }

    /// Validate raw input and apply it. See [`Session::apply`].
    pub fn apply_delta(
        &mut self,
        name: &str,
        delta: f64,
        direction: Direction,
        code: Option<&str>,
    ) -> Result<AppliedDelta, LedgerError> {
        let request = DeltaRequest::new(name, delta, direction)?;
        self.apply(&request, code)
    }

    /// The current ranking.
    pub fn rank(&self) -> RankedView {
        self.ledger.rank()
    }

    /// The whole table as CSV, in ledger order, for a manual download.
    pub fn export_csv(&self, unit: Unit) -> String {
        self.ledger.export_csv(unit)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store.describe())
            .field("gate", &self.gate.mode())
            .field("members", &self.ledger.len())
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use proptest::prelude::*;
    use scoreboard_gate::GateError;
    use scoreboard_store::{CsvFileStore, InMemoryTableStore, Row, StoreError, StoreResult, Table};

    use super::*;

    const CODE: &str = "points";

    /// Store whose writes can be switched off.
    struct FlakyStore {
        inner: InMemoryTableStore,
        fail_writes: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: InMemoryTableStore::new(),
                fail_writes: AtomicBool::new(false),
            }
        }
    }

    impl TableStore for FlakyStore {
        fn read(&self) -> StoreResult<Option<Table>> {
            self.inner.read()
        }

        fn write(&self, table: &Table) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("sheet offline".into()));
            }
            self.inner.write(table)
        }

        fn describe(&self) -> String {
            "flaky".into()
        }
    }

    fn name(n: &str) -> MemberName {
        MemberName::new(n).unwrap()
    }

    fn roster(list: &[&str]) -> SessionConfig {
        SessionConfig::with_roster(list.iter().map(|n| name(n)).collect())
    }

    fn session(store: Arc<dyn TableStore>) -> Session {
        Session::open(
            store,
            AccessGate::shared_code(CODE).unwrap(),
            roster(&["A", "B", "C"]),
        )
    }

    fn totals(session: &Session) -> Vec<f64> {
        session.ledger().records().iter().map(|r| r.total()).collect()
    }

    #[test]
    fn add_then_rank_scenario() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut session = session(store.clone());
        assert_eq!(session.source(), &LoadSource::Seeded);

        let applied = session
            .apply_delta("A", 10.0, Direction::Add, Some(CODE))
            .unwrap();
        assert_eq!(applied.current, 10.0);
        assert!(applied.persisted);

        let view = session.rank();
        let ranked: Vec<(usize, &str, f64)> = view
            .iter()
            .map(|e| (e.rank, e.name.as_str(), e.progress))
            .collect();
        assert_eq!(ranked, vec![(1, "A", 1.0), (2, "B", 0.0), (3, "C", 0.0)]);

        assert_eq!(
            store.read().unwrap(),
            Some(Table::new(vec![
                Row::new("A", 10.0),
                Row::new("B", 0.0),
                Row::new("C", 0.0),
            ]))
        );
    }

    #[test]
    fn redeem_clamps_scenario() {
        let mut session = session(Arc::new(InMemoryTableStore::new()));
        session
            .apply_delta("A", 10.0, Direction::Add, Some(CODE))
            .unwrap();
        let applied = session
            .apply_delta("A", 15.0, Direction::Subtract, Some(CODE))
            .unwrap();
        assert_eq!(applied.previous, 10.0);
        assert_eq!(applied.current, 0.0);
        assert_eq!(session.ledger().total(&name("A")), Some(0.0));
    }

    #[test]
    fn wrong_code_scenario() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut session = session(store.clone());
        let err = session
            .apply_delta("A", 5.0, Direction::Add, Some("wrong"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized(GateError::Denied)));
        assert_eq!(totals(&session), vec![0.0, 0.0, 0.0]);
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn open_gate_needs_no_code() {
        let mut session = Session::open(
            Arc::new(InMemoryTableStore::new()),
            AccessGate::open(),
            roster(&["A"]),
        );
        session.apply_delta("A", 2.0, Direction::Add, None).unwrap();
        assert_eq!(session.ledger().total(&name("A")), Some(2.0));
    }

    #[test]
    fn unknown_member_is_rejected_without_write() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut session = session(store.clone());
        let err = session
            .apply_delta("Zed", 1.0, Direction::Add, Some(CODE))
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn invalid_delta_is_rejected_at_the_boundary() {
        let mut session = session(Arc::new(InMemoryTableStore::new()));
        let err = session
            .apply_delta("A", 0.0, Direction::Add, Some(CODE))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDelta(_)));
    }

    #[test]
    fn surfaced_write_failure_rolls_back() {
        let store = Arc::new(FlakyStore::new());
        let mut session = session(store.clone());
        session
            .apply_delta("A", 3.0, Direction::Add, Some(CODE))
            .unwrap();

        store.fail_writes.store(true, Ordering::SeqCst);
        let err = session
            .apply_delta("A", 4.0, Direction::Add, Some(CODE))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::Unavailable(_))));
        assert_eq!(session.ledger().total(&name("A")), Some(3.0));
    }

    #[test]
    fn swallowed_write_failure_keeps_change() {
        let store = Arc::new(FlakyStore::new());
        store.fail_writes.store(true, Ordering::SeqCst);
        let mut config = roster(&["A"]);
        config.on_write_failure = WriteFailurePolicy::Swallow;
        let mut session = Session::open(store, AccessGate::shared_code(CODE).unwrap(), config);

        let applied = session
            .apply_delta("A", 4.0, Direction::Add, Some(CODE))
            .unwrap();
        assert!(!applied.persisted);
        assert_eq!(session.ledger().total(&name("A")), Some(4.0));
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut session = session(store.clone());
        store
            .write(&Table::new(vec![
                Row::new("A", 1.0),
                Row::new("B", 50.0),
                Row::new("C", 2.0),
            ]))
            .unwrap();

        assert_eq!(session.reload(), LoadSource::Stored);
        assert_eq!(session.source(), &LoadSource::Stored);
        assert_eq!(session.rank().entries[0].name.as_str(), "B");
    }

    #[test]
    fn reload_failure_keeps_current_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.csv");
        let store = Arc::new(CsvFileStore::new(&path, "Total Points"));
        let mut session = session(store);
        session
            .apply_delta("B", 7.0, Direction::Add, Some(CODE))
            .unwrap();

        std::fs::write(&path, "garbage without a name header\n").unwrap();
        assert!(session.reload().is_fallback());
        assert_eq!(session.ledger().total(&name("B")), Some(7.0));
        assert_eq!(session.source(), &LoadSource::Seeded);
    }

    #[test]
    fn fallback_session_refuses_to_overwrite_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.csv");
        let unreadable = "Nme,Total Points\nA,500\nB,300\n";
        std::fs::write(&path, unreadable).unwrap();

        let mut session = session(Arc::new(CsvFileStore::new(&path, "Total Points")));
        assert!(session.source().is_fallback());

        let err = session
            .apply_delta("A", 1.0, Direction::Add, Some(CODE))
            .unwrap_err();
        assert!(matches!(err, LedgerError::StoreUnreadable(_)));
        assert!(!err.is_invalid_input());
        assert_eq!(totals(&session), vec![0.0, 0.0, 0.0]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), unreadable);

        std::fs::write(&path, "Name,Total Points\nA,500\nB,300\n").unwrap();
        assert_eq!(session.reload(), LoadSource::Stored);
        let applied = session
            .apply_delta("A", 1.0, Direction::Add, Some(CODE))
            .unwrap();
        assert_eq!(applied.current, 501.0);
    }

    #[test]
    fn fallback_session_still_checks_the_code_first() {
        let mut session = Session::open(
            Arc::new(FailingReads),
            AccessGate::shared_code(CODE).unwrap(),
            roster(&["A"]),
        );
        let err = session
            .apply_delta("A", 1.0, Direction::Add, Some("wrong"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized(_)));
    }

    struct FailingReads;

    impl TableStore for FailingReads {
        fn read(&self) -> StoreResult<Option<Table>> {
            Err(StoreError::Unavailable("sheet offline".into()))
        }

        fn write(&self, _table: &Table) -> StoreResult<()> {
            panic!("nothing may be written over an unread store")
        }

        fn describe(&self) -> String {
            "failing reads".into()
        }
    }

    #[test]
    fn file_backed_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.csv");
        {
            let mut first = session(Arc::new(CsvFileStore::new(&path, "Total Points")));
            first
                .apply_delta("C", 12.5, Direction::Add, Some(CODE))
                .unwrap();
        }
        let second = session(Arc::new(CsvFileStore::new(&path, "Total Points")));
        assert_eq!(second.source(), &LoadSource::Stored);
        assert_eq!(second.ledger().total(&name("C")), Some(12.5));
    }

    #[test]
    fn export_is_ledger_order_csv() {
        let mut session = session(Arc::new(InMemoryTableStore::new()));
        session
            .apply_delta("B", 90.0, Direction::Add, Some(CODE))
            .unwrap();
        assert_eq!(
            session.export_csv(Unit::Minutes),
            "Name,Total Minutes\nA,0\nB,90\nC,0\n"
        );
    }

    #[derive(Clone, Debug)]
    struct Op {
        member: usize,
        delta: f64,
        direction: Direction,
        authorized: bool,
    }

    fn op() -> impl Strategy<Value = Op> {
        (0usize..3, 0.5f64..500.0, any::<bool>(), any::<bool>()).prop_map(
            |(member, delta, add, authorized)| Op {
                member,
                delta,
                direction: if add { Direction::Add } else { Direction::Subtract },
                authorized,
            },
        )
    }

    proptest! {
        #[test]
        fn totals_stay_non_negative_and_bad_codes_change_nothing(
            ops in proptest::collection::vec(op(), 1..40)
        ) {
            let mut session = session(Arc::new(InMemoryTableStore::new()));
            let members = ["A", "B", "C"];
            for Op { member, delta, direction, authorized } in ops {
                let before = totals(&session);
                let code = if authorized { CODE } else { "nope" };
                let result = session.apply_delta(members[member], delta, direction, Some(code));
                if authorized {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert!(result.is_err());
                    prop_assert_eq!(&totals(&session), &before);
                }
                prop_assert!(totals(&session).iter().all(|t| *t >= 0.0));
            }
        }
    }
}
