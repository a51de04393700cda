use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Number of random digits appended per hierarchy level.
pub const UID_TERM_LEN: usize = 8;

/// Generator of study, series and instance UIDs under a common root.
///
/// Each level appends a term of random decimal digits to its parent, so a
/// series UID starts with its study UID and an instance UID with its series
/// UID. The terms are meant for uniqueness within a study, not secrecy.
#[derive(Debug, Clone)]
pub struct UidGenerator<R = StdRng> {
    root: String,
    rng: R,
}

impl UidGenerator<StdRng> {
    pub fn new(root: impl Into<String>) -> Self {
        Self::with_rng(root, StdRng::from_entropy())
    }
}

impl<R: Rng> UidGenerator<R> {
    pub fn with_rng(root: impl Into<String>, rng: R) -> Self {
        Self {
            root: root.into(),
            rng,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn study_uid(&mut self) -> String {
        let root = self.root.clone();
        self.child_uid(&root)
    }

    pub fn series_uid(&mut self, study_uid: &str) -> String {
        self.child_uid(study_uid)
    }

    pub fn instance_uid(&mut self, series_uid: &str) -> String {
        self.child_uid(series_uid)
    }

    fn child_uid(&mut self, parent: &str) -> String {
        let mut uid = String::with_capacity(parent.len() + 1 + UID_TERM_LEN);
        uid.push_str(parent);
        uid.push('.');
        self.push_term(&mut uid);
        uid
    }

    fn push_term(&mut self, out: &mut String) {
        for _ in 0..UID_TERM_LEN {
            let digit: u8 = self.rng.gen_range(0..10);
            out.push(char::from(b'0' + digit));
        }
    }
}

/// Frame of reference UID of a single-frame instance.
pub fn frame_of_reference_uid(instance_uid: &str) -> String {
    format!("{instance_uid}.0")
}
