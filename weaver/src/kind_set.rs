use rpcweave_shared::RemoteCallKind;

/// The remote-call kinds a single procedure is annotated with. Observers + Target is the
/// only combination that may appear together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindSet {
    Single(RemoteCallKind),
    ObserversAndTarget,
}

impl KindSet {
    pub fn from_kinds(kinds: &[RemoteCallKind]) -> Option<Self> {
        match kinds {
            [kind] => Some(KindSet::Single(*kind)),
            [RemoteCallKind::Observers, RemoteCallKind::Target]
            | [RemoteCallKind::Target, RemoteCallKind::Observers] => {
                Some(KindSet::ObserversAndTarget)
            }
            _ => None,
        }
    }

    /// Member kinds, Observers before Target.
    pub fn kinds(&self) -> &'static [RemoteCallKind] {
        match self {
            KindSet::Single(RemoteCallKind::Server) => &[RemoteCallKind::Server],
            KindSet::Single(RemoteCallKind::Observers) => &[RemoteCallKind::Observers],
            KindSet::Single(RemoteCallKind::Target) => &[RemoteCallKind::Target],
            KindSet::ObserversAndTarget => &[RemoteCallKind::Observers, RemoteCallKind::Target],
        }
    }

    pub fn contains(&self, kind: RemoteCallKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// Whether parameters follow the client-to-server layout (optional trailing caller
    /// connection after the channel).
    pub fn is_server(&self) -> bool {
        matches!(self, KindSet::Single(RemoteCallKind::Server))
    }
}
