use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// A template rendered with the fields of `Self` as its context.
///
/// Names ending in `.html` have all interpolated values html escaped unless a
/// template explicitly marks them as safe.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE_NAME: &str = "base.html";
pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    AdminNotificationTemplate("admin_notification.html"),
    SenderAcknowledgmentTemplate("sender_acknowledgment.html"),
}

/// Notification sent to the site owner for every accepted contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminNotificationTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub received_at: String,
    /// `mailto:` link that opens a reply to the sender.
    pub reply_url: String,
}

/// Confirmation sent back to the person who submitted the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderAcknowledgmentTemplate {
    pub subject: String,
    pub message: String,
    pub received_at: String,
    pub contact_email: String,
    pub profile: Profile,
}

/// Public details of the site owner shown in outgoing emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub website: String,
    pub github: String,
    pub linkedin: String,
}
