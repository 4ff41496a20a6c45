/// Observer notified as entries move across the wire.
///
/// Every method has an empty default so implementors only override the
/// events they care about.
pub trait TransferListener {
    /// A directory header was accepted.
    fn directory_started(&mut self, _name: &str) {}

    /// The matching `E` of a directory was processed.
    fn directory_finished(&mut self, _name: &str) {}

    /// A file payload of `size` bytes is about to be streamed.
    fn file_started(&mut self, _name: &str, _size: u64) {}

    /// Cumulative bytes of the current file moved so far.
    fn progress(&mut self, _transferred: u64) {}

    /// The current file was acknowledged by both sides.
    fn file_finished(&mut self, _name: &str) {}
}

/// Listener that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl TransferListener for NoopListener {}

impl<L: TransferListener + ?Sized> TransferListener for &mut L {
    fn directory_started(&mut self, name: &str) {
        (**self).directory_started(name);
    }

    fn directory_finished(&mut self, name: &str) {
        (**self).directory_finished(name);
    }

    fn file_started(&mut self, name: &str, size: u64) {
        (**self).file_started(name, size);
    }

    fn progress(&mut self, transferred: u64) {
        (**self).progress(transferred);
    }

    fn file_finished(&mut self, name: &str) {
        (**self).file_finished(name);
    }
}
