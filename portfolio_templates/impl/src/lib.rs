use std::sync::Arc;

use portfolio_di::Build;
use portfolio_templates_contracts::{
    Template, TemplateService, BASE_TEMPLATE, BASE_TEMPLATE_NAME, TEMPLATES,
};
use tera::Tera;

#[derive(Debug, Clone, Default, Build)]
pub struct TemplateServiceImpl {
    #[state]
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();

        // parents have to be registered before the templates extending them
        tera.add_raw_template(BASE_TEMPLATE_NAME, BASE_TEMPLATE)
            .unwrap();

        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template).unwrap();
        }

        Self(tera.into())
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.state.0.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use portfolio_templates_contracts::{
        AdminNotificationTemplate, Profile, SenderAcknowledgmentTemplate,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn sut() -> TemplateServiceImpl {
        TemplateServiceImpl::default()
    }

    fn admin_notification(message: &str) -> AdminNotificationTemplate {
        AdminNotificationTemplate {
            name: "Max Mustermann".into(),
            email: "max@example.com".into(),
            subject: "Hello".into(),
            message: message.into(),
            received_at: "Friday, January 3, 2025 at 02:04:05 PM UTC".into(),
            reply_url: "mailto:max@example.com?subject=Re%3A%20Hello".into(),
        }
    }

    fn sender_acknowledgment(message: &str) -> SenderAcknowledgmentTemplate {
        SenderAcknowledgmentTemplate {
            subject: "Hello".into(),
            message: message.into(),
            received_at: "Friday, January 3, 2025 at 02:04 PM UTC".into(),
            contact_email: "owner@example.com".into(),
            profile: Profile {
                name: "Subash S".into(),
                title: "Full Stack Developer".into(),
                location: "Chennai, India".into(),
                website: "https://subash.zeabur.app/".into(),
                github: "https://github.com/Subash-S-66".into(),
                linkedin: "https://www.linkedin.com/in/subash-s-514aa9373".into(),
            },
        }
    }

    #[test]
    fn admin_notification_contents() {
        // Act
        let result = sut()
            .render(&admin_notification("Hello there"))
            .unwrap();

        // Assert
        assert!(result.contains("Max Mustermann"));
        assert!(result.contains("mailto:max@example.com"));
        assert!(result.contains("Reply to Max Mustermann"));
        assert!(result.contains("RECEIVED Friday, January 3, 2025 at 02:04:05 PM UTC"));
        assert!(result.contains("Hello there"));
    }

    #[test]
    fn admin_notification_escapes_user_input() {
        // Arrange
        let mut template = admin_notification("<script>alert(1)</script>\nsecond line");
        template.name = "<b>Max</b>".into();

        // Act
        let result = sut().render(&template).unwrap();

        // Assert
        assert!(!result.contains("<script>"));
        assert!(!result.contains("<b>Max</b>"));
        assert!(result.contains("&lt;script&gt;alert(1)&lt;&#x2F;script&gt;<br>second line"));
        assert!(result.contains("&lt;b&gt;Max&lt;&#x2F;b&gt;"));
    }

    #[test]
    fn sender_acknowledgment_contents() {
        // Act
        let result = sut()
            .render(&sender_acknowledgment("line one\nline two"))
            .unwrap();

        // Assert
        assert!(result.contains("line one<br>line two"));
        assert!(result.contains("24 – 48 hrs"));
        assert!(result.contains("github.com&#x2F;Subash-S-66"));
        assert!(result.contains("Subash S"));
        assert!(result.contains("owner@example.com"));
    }

    #[test]
    fn sender_acknowledgment_escapes_user_input() {
        let result = sut()
            .render(&sender_acknowledgment("<img src=x onerror=alert(1)>"))
            .unwrap();

        assert!(!result.contains("<img"));
        assert!(result.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn registered_templates() {
        let names = TEMPLATES.iter().map(|&(name, _)| name).collect::<Vec<_>>();
        assert_eq!(
            names,
            ["admin_notification.html", "sender_acknowledgment.html"]
        );
    }
}
