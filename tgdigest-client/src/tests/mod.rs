mod login_code;
