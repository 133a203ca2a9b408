use askama::Template;

#[derive(Debug, Template)]
#[template(path = "partials/logo.html")]
pub struct Logo {
    pub size: u32,
}

impl Default for Logo {
    fn default() -> Self {
        Self { size: 40 }
    }
}

impl Logo {
    pub fn header() -> Self {
        Self { size: 48 }
    }
}
