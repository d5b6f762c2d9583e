use std::io;

/// Hands a link off to something outside the application.
pub trait ExternalOpener {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens links with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        open::that_detached(url)
    }
}
