/// All localized user-facing strings for a language.
///
/// Strings are stored raw; views escape them when rendering HTML.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Layout ====================
    pub app_name: &'static str,
    pub nav_home: &'static str,
    pub nav_translators: &'static str,
    pub nav_login: &'static str,
    pub nav_register: &'static str,
    pub nav_profile: &'static str,
    pub nav_logout: &'static str,
    pub language_label: &'static str,
    /// Placeholders: {name}
    pub signed_in_as: &'static str,

    // ==================== Home ====================
    pub home_tagline: &'static str,
    pub home_browse: &'static str,
    pub home_join: &'static str,

    // ==================== Forms ====================
    pub field_email: &'static str,
    pub field_password: &'static str,
    pub field_name: &'static str,
    pub field_role: &'static str,
    pub role_client: &'static str,
    pub role_translator: &'static str,
    pub field_languages: &'static str,
    pub field_bio: &'static str,
    pub field_experience: &'static str,
    pub field_hourly_rate: &'static str,
    pub field_phone: &'static str,
    pub field_company: &'static str,
    pub field_preferred_languages: &'static str,
    pub field_notes: &'static str,
    pub field_rating: &'static str,
    pub field_comment: &'static str,

    // ==================== Register / Login ====================
    pub register_title: &'static str,
    pub register_translator_section: &'static str,
    pub register_submit: &'static str,
    pub register_have_account: &'static str,
    pub login_title: &'static str,
    pub login_submit: &'static str,
    pub login_no_account: &'static str,

    // ==================== Profile ====================
    pub profile_title: &'static str,
    pub profile_save: &'static str,
    pub profile_updated: &'static str,
    pub profile_my_reviews: &'static str,
    pub profile_no_reviews: &'static str,

    // ==================== Directory ====================
    pub translators_title: &'static str,
    pub translators_empty: &'static str,
    /// Placeholders: {years}
    pub years_experience: &'static str,
    /// Placeholders: {rate}
    pub hourly_rate: &'static str,
    /// Placeholders: {count}. Used when there is exactly one review.
    pub review_count_one: &'static str,
    /// Placeholders: {count}
    pub review_count: &'static str,
    pub no_reviews: &'static str,
    pub average_rating: &'static str,
    pub view_profile: &'static str,

    // ==================== Detail / Reviews ====================
    pub reviews_title: &'static str,
    pub reviews_empty: &'static str,
    pub review_leave: &'static str,
    pub review_submit: &'static str,
    pub review_login_hint: &'static str,
    pub back_to_list: &'static str,

    // ==================== Errors ====================
    pub error_title: &'static str,
    pub back_home: &'static str,
}

impl LanguageStrings {
    /// Fill `{key}` placeholders in a template
    pub fn format(template: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{}}}", key), value)
        })
    }

    /// Review count label with the singular form for exactly one review
    pub fn reviews_counted(&self, count: i64) -> String {
        let template = if count == 1 {
            self.review_count_one
        } else {
            self.review_count
        };
        Self::format(template, &[("count", count.to_string().as_str())])
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    app_name: "Translator Finder",
    nav_home: "Home",
    nav_translators: "Translators",
    nav_login: "Sign In",
    nav_register: "Register",
    nav_profile: "My Profile",
    nav_logout: "Log Out",
    language_label: "Language",
    signed_in_as: "Signed in as {name}",

    home_tagline: "Find a trusted Vietnamese and Czech translator.",
    home_browse: "Browse translators",
    home_join: "Create an account",

    field_email: "Email",
    field_password: "Password",
    field_name: "Name",
    field_role: "I am a",
    role_client: "Client",
    role_translator: "Translator",
    field_languages: "Languages",
    field_bio: "Bio",
    field_experience: "Years of experience",
    field_hourly_rate: "Hourly rate (USD)",
    field_phone: "Phone",
    field_company: "Company",
    field_preferred_languages: "Preferred languages",
    field_notes: "Notes",
    field_rating: "Rating",
    field_comment: "Comment",

    register_title: "Create Account",
    register_translator_section: "Translator details (translators only)",
    register_submit: "Create Account",
    register_have_account: "Already have an account?",
    login_title: "Sign In",
    login_submit: "Sign In",
    login_no_account: "No account yet?",

    profile_title: "Edit Profile",
    profile_save: "Save changes",
    profile_updated: "Profile updated successfully",
    profile_my_reviews: "My reviews",
    profile_no_reviews: "You have not written any reviews yet.",

    translators_title: "Translators",
    translators_empty: "No translators have registered yet.",
    years_experience: "{years} years of experience",
    hourly_rate: "${rate}/hour",
    review_count_one: "{count} review",
    review_count: "{count} reviews",
    no_reviews: "No reviews",
    average_rating: "Average rating",
    view_profile: "View profile",

    reviews_title: "Reviews",
    reviews_empty: "No reviews yet.",
    review_leave: "Leave a review",
    review_submit: "Submit review",
    review_login_hint: "Sign in as a client to leave a review.",
    back_to_list: "Back to translators",

    error_title: "Error",
    back_home: "Back to home",
};

// ==================== Czech Strings ====================

pub const CZECH_STRINGS: LanguageStrings = LanguageStrings {
    app_name: "Translator Finder",
    nav_home: "Domů",
    nav_translators: "Překladatelé",
    nav_login: "Přihlásit se",
    nav_register: "Registrace",
    nav_profile: "Můj profil",
    nav_logout: "Odhlásit se",
    language_label: "Jazyk",
    signed_in_as: "Přihlášen jako {name}",

    home_tagline: "Najděte spolehlivého vietnamského a českého překladatele.",
    home_browse: "Procházet překladatele",
    home_join: "Vytvořit účet",

    field_email: "E-mail",
    field_password: "Heslo",
    field_name: "Jméno",
    field_role: "Jsem",
    role_client: "Klient",
    role_translator: "Překladatel",
    field_languages: "Jazyky",
    field_bio: "O mně",
    field_experience: "Roky praxe",
    field_hourly_rate: "Hodinová sazba (USD)",
    field_phone: "Telefon",
    field_company: "Firma",
    field_preferred_languages: "Preferované jazyky",
    field_notes: "Poznámky",
    field_rating: "Hodnocení",
    field_comment: "Komentář",

    register_title: "Vytvořit účet",
    register_translator_section: "Údaje překladatele (jen pro překladatele)",
    register_submit: "Vytvořit účet",
    register_have_account: "Už máte účet?",
    login_title: "Přihlášení",
    login_submit: "Přihlásit se",
    login_no_account: "Ještě nemáte účet?",

    profile_title: "Upravit profil",
    profile_save: "Uložit změny",
    profile_updated: "Profil byl úspěšně aktualizován",
    profile_my_reviews: "Moje recenze",
    profile_no_reviews: "Zatím jste nenapsali žádnou recenzi.",

    translators_title: "Překladatelé",
    translators_empty: "Zatím se nezaregistroval žádný překladatel.",
    years_experience: "{years} let praxe",
    hourly_rate: "${rate}/hod",
    review_count_one: "Počet recenzí: {count}",
    review_count: "Počet recenzí: {count}",
    no_reviews: "Bez hodnocení",
    average_rating: "Průměrné hodnocení",
    view_profile: "Zobrazit profil",

    reviews_title: "Recenze",
    reviews_empty: "Zatím žádné recenze.",
    review_leave: "Napsat recenzi",
    review_submit: "Odeslat recenzi",
    review_login_hint: "Pro napsání recenze se přihlaste jako klient.",
    back_to_list: "Zpět na překladatele",

    error_title: "Chyba",
    back_home: "Zpět na úvod",
};

// ==================== Vietnamese Strings ====================

pub const VIETNAMESE_STRINGS: LanguageStrings = LanguageStrings {
    app_name: "Translator Finder",
    nav_home: "Trang chủ",
    nav_translators: "Phiên dịch viên",
    nav_login: "Đăng nhập",
    nav_register: "Đăng ký",
    nav_profile: "Hồ sơ của tôi",
    nav_logout: "Đăng xuất",
    language_label: "Ngôn ngữ",
    signed_in_as: "Đã đăng nhập: {name}",

    home_tagline: "Tìm phiên dịch viên tiếng Việt và tiếng Séc đáng tin cậy.",
    home_browse: "Xem phiên dịch viên",
    home_join: "Tạo tài khoản",

    field_email: "Email",
    field_password: "Mật khẩu",
    field_name: "Họ tên",
    field_role: "Tôi là",
    role_client: "Khách hàng",
    role_translator: "Phiên dịch viên",
    field_languages: "Ngôn ngữ",
    field_bio: "Giới thiệu",
    field_experience: "Số năm kinh nghiệm",
    field_hourly_rate: "Giá theo giờ (USD)",
    field_phone: "Điện thoại",
    field_company: "Công ty",
    field_preferred_languages: "Ngôn ngữ ưu tiên",
    field_notes: "Ghi chú",
    field_rating: "Đánh giá",
    field_comment: "Nhận xét",

    register_title: "Tạo tài khoản",
    register_translator_section: "Thông tin phiên dịch viên (chỉ dành cho phiên dịch viên)",
    register_submit: "Tạo tài khoản",
    register_have_account: "Đã có tài khoản?",
    login_title: "Đăng nhập",
    login_submit: "Đăng nhập",
    login_no_account: "Chưa có tài khoản?",

    profile_title: "Chỉnh sửa hồ sơ",
    profile_save: "Lưu thay đổi",
    profile_updated: "Cập nhật hồ sơ thành công",
    profile_my_reviews: "Đánh giá của tôi",
    profile_no_reviews: "Bạn chưa viết đánh giá nào.",

    translators_title: "Phiên dịch viên",
    translators_empty: "Chưa có phiên dịch viên nào đăng ký.",
    years_experience: "{years} năm kinh nghiệm",
    hourly_rate: "${rate}/giờ",
    review_count_one: "{count} đánh giá",
    review_count: "{count} đánh giá",
    no_reviews: "Chưa có đánh giá",
    average_rating: "Điểm trung bình",
    view_profile: "Xem hồ sơ",

    reviews_title: "Đánh giá",
    reviews_empty: "Chưa có đánh giá nào.",
    review_leave: "Viết đánh giá",
    review_submit: "Gửi đánh giá",
    review_login_hint: "Đăng nhập bằng tài khoản khách hàng để viết đánh giá.",
    back_to_list: "Quay lại danh sách",

    error_title: "Lỗi",
    back_home: "Về trang chủ",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_replaces_placeholders() {
        let text = LanguageStrings::format(ENGLISH_STRINGS.years_experience, &[("years", "5")]);
        assert_eq!(text, "5 years of experience");
    }

    #[test]
    fn test_format_leaves_unknown_placeholders() {
        let text = LanguageStrings::format("Hello {who}", &[("name", "x")]);
        assert_eq!(text, "Hello {who}");
    }

    #[test]
    fn test_placeholders_present_in_every_language() {
        for strings in [&ENGLISH_STRINGS, &CZECH_STRINGS, &VIETNAMESE_STRINGS] {
            assert!(strings.signed_in_as.contains("{name}"));
            assert!(strings.years_experience.contains("{years}"));
            assert!(strings.hourly_rate.contains("{rate}"));
            assert!(strings.review_count_one.contains("{count}"));
            assert!(strings.review_count.contains("{count}"));
        }
    }

    #[test]
    fn test_reviews_counted_uses_singular_for_one() {
        assert_eq!(ENGLISH_STRINGS.reviews_counted(1), "1 review");
        assert_eq!(ENGLISH_STRINGS.reviews_counted(2), "2 reviews");
        assert_eq!(ENGLISH_STRINGS.reviews_counted(0), "0 reviews");
        assert_eq!(VIETNAMESE_STRINGS.reviews_counted(1), "1 đánh giá");
    }

    #[test]
    fn test_translations_differ_from_english() {
        assert_ne!(CZECH_STRINGS.profile_title, ENGLISH_STRINGS.profile_title);
        assert_ne!(VIETNAMESE_STRINGS.profile_title, ENGLISH_STRINGS.profile_title);
        assert_ne!(CZECH_STRINGS.no_reviews, ENGLISH_STRINGS.no_reviews);
    }
}
